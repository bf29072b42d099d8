use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use pdf_cmap_strings::{IndirectRef, PdfExtractor, from_bytes};

/// Assembles a PDF-looking buffer one object at a time.
struct DocumentBuilder {
    data: Vec<u8>,
}

impl DocumentBuilder {
    fn new() -> Self {
        DocumentBuilder {
            data: b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec(),
        }
    }

    fn object(mut self, number: u32, body: &str) -> Self {
        write!(self.data, "{} 0 obj\n{}\nendobj\n", number, body).unwrap();
        self
    }

    fn raw_stream(mut self, number: u32, dict: &str, body: &[u8]) -> Self {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body).unwrap();
        let compressed = encoder.finish().unwrap();
        write!(
            self.data,
            "{} 0 obj\n<<{}/Length {}/Filter/FlateDecode>>\nstream\r\n",
            number,
            dict,
            compressed.len()
        )
        .unwrap();
        self.data.extend_from_slice(&compressed);
        self.data.extend_from_slice(b"\r\nendstream\r\nendobj\r\n");
        self
    }

    fn stream(self, number: u32, body: &str) -> Self {
        self.raw_stream(number, "", body.as_bytes())
    }

    fn finish(mut self) -> Vec<u8> {
        self.data.extend_from_slice(b"trailer\n<</Root 1 0 R>>\n%%EOF\n");
        self.data
    }
}

const CMAP_A_TO_B: &str = "/CIDInit /ProcSet findresource begin\n\
    12 dict begin\n\
    begincmap\n\
    1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
    1 beginbfchar\n<0041> <0042>\nendbfchar\n\
    endcmap\n";

#[test_log::test]
fn single_font_with_tounicode_cmap() {
    let data = DocumentBuilder::new()
        .object(3, "<</Type/Page/Resources<</Font<</F1 5 0 R>>>>/Contents 4 0 R>>")
        .object(5, "<</Type/Font/Subtype/Type0/BaseFont/ABCDEF+Gothic/Encoding/Identity-H/ToUnicode 6 0 R>>")
        .stream(6, CMAP_A_TO_B)
        .stream(4, "BT\n/F1 12 Tf\n<0041> Tj\nET\n")
        .finish();

    assert_eq!(from_bytes(&data).into_strings(), ["B"]);
}

#[test_log::test]
fn fonts_declared_after_their_content_still_resolve() {
    let data = DocumentBuilder::new()
        .stream(4, "BT\n/F1 12 Tf\n<0041> Tj\nET\n")
        .stream(6, CMAP_A_TO_B)
        .object(5, "<</Type/Font/Subtype/Type0/ToUnicode 6 0 R>>")
        .object(3, "<</Type/Page/Resources<</Font<</F1 5 0 R>>>>>>")
        .finish();

    assert_eq!(from_bytes(&data).joined(), "B");
}

#[test_log::test]
fn missing_header_gives_empty_output() {
    let mut data = b"%!PS-Adobe-3.0\n".to_vec();
    data.extend(
        DocumentBuilder::new()
            .object(3, "<</Resources<</Font<</F1 5 0 R>>>>>>")
            .stream(4, "/F1 1 Tf\n(hello) Tj\n")
            .finish(),
    );

    let output = from_bytes(&data);
    assert!(output.is_empty());
}

#[test_log::test]
fn xobject_streams_are_never_inflated() {
    let data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R>>>>>>")
        .raw_stream(8, "/Type/XObject/Subtype/Form", b"/F1 1 Tf\n(form) Tj\n")
        .stream(4, "/F1 1 Tf\n(page) Tj\n")
        .finish();

    assert_eq!(from_bytes(&data).into_strings(), ["page"]);
}

#[test_log::test]
fn fragments_keep_document_order_across_streams_and_kinds() {
    let data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R/F2 7 0 R>>>>>>")
        .object(5, "<</Type/Font/ToUnicode 6 0 R>>")
        .stream(6, CMAP_A_TO_B)
        .stream(4, "BT\n/F2 10 Tf\n(one) Tj\n/F1 10 Tf\n<0041> Tj\nET\n")
        .stream(9, "BT\n/F2 10 Tf\n[(th)-80(ree)] TJ\nET\n")
        .finish();

    let output = from_bytes(&data);
    assert_eq!(output.texts().collect::<Vec<_>>(), ["one", "B", "three"]);
    let fonts: Vec<&str> = output.fragments().iter().map(|f| f.font.as_str()).collect();
    assert_eq!(fonts, ["F2", "F1", "F2"]);
    assert_eq!(output.joined(), "oneBthree");
}

#[test_log::test]
fn unknown_font_never_contributes_text() {
    let data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R>>>>>>")
        .stream(4, "/F1 1 Tf\n(kept) Tj\n/F9 1 Tf\n(lost) Tj\n<0041> Tj\n")
        .finish();

    assert_eq!(from_bytes(&data).into_strings(), ["kept"]);
}

#[test_log::test]
fn broken_stream_is_isolated() {
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let captured = Rc::clone(&seen);

    let mut data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R>>>>>>")
        .finish();
    data.extend_from_slice(b"8 0 obj\n<</Length 6/Filter/FlateDecode>>\nstream\n\x78\x9c\xff\xff\xff\xff\nendstream\nendobj\n");
    data.extend(
        DocumentBuilder::new()
            .stream(4, "/F1 1 Tf\n(survivor) Tj\n")
            .finish(),
    );

    let output = PdfExtractor::builder()
        .sink(move |m: &str| captured.borrow_mut().push(m.to_string()))
        .build()
        .from_bytes(&data);

    assert_eq!(output.into_strings(), ["survivor"]);
    assert!(seen.borrow().iter().any(|m| m.contains("inflate failed")));
}

#[test_log::test]
fn shift_jis_font_passes_literal_text_through() {
    let mut content = b"BT\n/F1 10.5 Tf\n(".to_vec();
    content.extend_from_slice(b"\x93\xfa\x96\x7b\x8c\xea");
    content.extend_from_slice(b") Tj\nET\n");

    let data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R>>>>>>")
        .object(5, "<</Type/Font/Subtype/Type0/BaseFont/MS-Mincho/Encoding/90ms-RKSJ-H>>")
        .raw_stream(4, "", &content)
        .finish();

    assert_eq!(from_bytes(&data).into_strings(), ["\u{65e5}\u{672c}\u{8a9e}"]);
}

#[test_log::test]
fn bfrange_maps_a_run_of_codes() {
    let cmap = "1 beginbfrange\n<0003> <0005> <3042>\nendbfrange\n";
    let data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R>>>>>>")
        .object(5, "<</Type/Font/ToUnicode 6 0 R>>")
        .stream(6, cmap)
        .stream(4, "BT\n/F1 9 Tf\n[<0003>12<00040005>] TJ\nET\n")
        .finish();

    assert_eq!(from_bytes(&data).into_strings(), ["\u{3042}\u{3043}\u{3044}"]);
}

#[test_log::test]
fn scan_report_exposes_collected_metadata() {
    let data = DocumentBuilder::new()
        .object(3, "<</Resources<</Font<</F1 5 0 R/F2 7 0 R>>>>>>")
        .object(5, "<</Type/Font/ToUnicode 6 0 R>>")
        .object(7, "<</Type/Font/Encoding/90ms-RKSJ-H>>")
        .stream(6, CMAP_A_TO_B)
        .finish();

    let report = PdfExtractor::default().scan(&data);
    assert!(report.header_accepted());
    assert_eq!(report.fonts().resource("F2"), Some(IndirectRef::new(7, 0)));
    assert!(report.fonts().is_shift_jis(IndirectRef::new(7, 0)));
    let cmap = report.fonts().to_unicode(IndirectRef::new(5, 0)).unwrap();
    assert_eq!(report.cmaps().get(cmap).unwrap().entries(), [(0x0041, 0x0042)]);
    assert!(report.fragments().is_empty());
}
