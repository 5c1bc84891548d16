// End-to-end round trip: binary -> text -> binary must be byte-identical

use seasonde_ts::{dump_blocks, fixup_sizes, parse_file, parse_text, write_blocks, Tag};
use std::io::Cursor;

fn push_block(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
}

fn fixed64(text: &str) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..text.len()].copy_from_slice(text.as_bytes());
    out
}

/// A small but complete TS file with every leaf type present, fix2 samples,
/// scale factors I=3.0 Q=5.0, and canonical container sizes.
fn sample_file() -> Vec<u8> {
    let mut sign = Vec::new();
    sign.extend_from_slice(b"V001");
    sign.extend_from_slice(b"AQTS");
    sign.extend_from_slice(b"BML1");
    sign.extend_from_slice(&0x2Au32.to_be_bytes());
    sign.extend_from_slice(&fixed64("time series test file"));
    sign.extend_from_slice(&fixed64("nobody in particular"));
    sign.extend_from_slice(&fixed64("no comment"));

    let mcda = (1_518_301_200u32 + 2_082_844_800).to_be_bytes();

    let mut cnst = Vec::new();
    for v in [3i32, 32, 2048, 2] {
        cnst.extend_from_slice(&v.to_be_bytes());
    }

    let mut swep = Vec::new();
    swep.extend_from_slice(&2048i32.to_be_bytes());
    swep.extend_from_slice(&25_000_000.0f64.to_be_bytes());
    swep.extend_from_slice(&150_000.0f64.to_be_bytes());
    swep.extend_from_slice(&2.0f64.to_be_bytes());
    swep.extend_from_slice(&0i32.to_be_bytes());

    let mut fbin = Vec::new();
    fbin.extend_from_slice(b"cviq");
    fbin.extend_from_slice(b"fix2");

    let mut scal = Vec::new();
    scal.extend_from_slice(&3.0f64.to_be_bytes());
    scal.extend_from_slice(&5.0f64.to_be_bytes());

    let mut alvl = Vec::new();
    for (i, q) in [(16383i16, -16384i16), (0, 0), (32767, 16000)] {
        alvl.extend_from_slice(&i.to_be_bytes());
        alvl.extend_from_slice(&q.to_be_bytes());
    }

    let mut head = Vec::new();
    push_block(&mut head, b"sign", &sign);
    push_block(&mut head, b"mcda", &mcda);
    push_block(&mut head, b"cnst", &cnst);
    push_block(&mut head, b"swep", &swep);
    push_block(&mut head, b"fbin", &fbin);
    push_block(&mut head, b"gtag", &1u32.to_be_bytes());
    push_block(&mut head, b"atag", &2u32.to_be_bytes());
    push_block(&mut head, b"indx", &1u32.to_be_bytes());
    push_block(&mut head, b"scal", &scal);

    let mut body = Vec::new();
    push_block(&mut body, b"alvl", &alvl);

    let mut inner = Vec::new();
    push_block(&mut inner, b"HEAD", &head);
    push_block(&mut inner, b"BODY", &body);

    let mut file = Vec::new();
    push_block(&mut file, b"AQLV", &inner);
    push_block(&mut file, b"END ", &[]);
    file
}

#[test]
fn test_binary_text_binary_is_byte_identical() {
    let original = sample_file();

    let blocks = parse_file(&original).expect("decode");
    let mut text = Vec::new();
    dump_blocks(&blocks, &mut text, false).expect("dump");

    let mut reparsed = parse_text(Cursor::new(&text)).expect("gen");
    fixup_sizes(&mut reparsed).expect("backpatch");
    let mut regenerated = Vec::new();
    write_blocks(&reparsed, &mut regenerated).expect("encode");

    assert_eq!(regenerated, original);
}

#[test]
fn test_backpatched_sizes_match_decoded_sizes() {
    let original = sample_file();
    let decoded = parse_file(&original).unwrap();

    let mut rebuilt = decoded.clone();
    for block in rebuilt.iter_mut() {
        if block.tag.is_container() {
            block.size = 0;
        }
    }
    fixup_sizes(&mut rebuilt).unwrap();
    assert_eq!(rebuilt, decoded);

    let aqlv = decoded.iter().find(|b| b.tag == Tag::Aqlv).unwrap();
    let head = decoded.iter().find(|b| b.tag == Tag::Head).unwrap();
    let body = decoded.iter().find(|b| b.tag == Tag::Body).unwrap();
    assert_eq!(aqlv.size, 16 + head.size + body.size);
}

#[test]
fn test_header_only_dump_stops_before_body() {
    let blocks = parse_file(&sample_file()).unwrap();
    let mut text = Vec::new();
    dump_blocks(&blocks, &mut text, true).unwrap();
    let text = String::from_utf8(text).unwrap();

    assert!(text.contains("scal"));
    assert!(!text.contains("BODY"));
    assert!(!text.contains("i:"));
}

#[test]
fn test_cli_style_file_round_trip() {
    use std::fs;
    use std::io::BufReader;

    let dir = tempfile::tempdir().unwrap();
    let bin_path = dir.path().join("input.ts");
    let txt_path = dir.path().join("dumped.txt");
    let out_path = dir.path().join("regenerated.ts");

    fs::write(&bin_path, sample_file()).unwrap();

    // tsdump
    let data = fs::read(&bin_path).unwrap();
    let blocks = parse_file(&data).unwrap();
    let mut text = Vec::new();
    dump_blocks(&blocks, &mut text, false).unwrap();
    fs::write(&txt_path, &text).unwrap();

    // tsgen
    let reader = BufReader::new(fs::File::open(&txt_path).unwrap());
    let mut blocks = parse_text(reader).unwrap();
    fixup_sizes(&mut blocks).unwrap();
    let mut out = Vec::new();
    write_blocks(&blocks, &mut out).unwrap();
    fs::write(&out_path, &out).unwrap();

    assert_eq!(fs::read(&out_path).unwrap(), fs::read(&bin_path).unwrap());
}

#[test]
fn test_truncated_final_block_still_decodes() {
    let mut file = sample_file();
    // overstate the alvl size: find the alvl header and bump its size field
    let pos = file
        .windows(4)
        .position(|w| w == b"alvl")
        .expect("alvl present");
    file[pos + 4..pos + 8].copy_from_slice(&1000u32.to_be_bytes());
    let blocks = parse_file(&file).expect("clamped, not fatal");
    let alvl = blocks.iter().find(|b| b.tag == Tag::Alvl).unwrap();
    assert_eq!(alvl.size, 12);
}
