use std::env;

fn main() {
    let file = env::args()
        .nth(1)
        .expect("Usage: dump_tounicode <pdf_file>");

    let bytes = std::fs::read(&file).expect("Failed to read PDF");
    let report = pdf_cmap_strings::PdfExtractor::default().scan(&bytes);

    let mut tables: Vec<_> = report.cmaps().iter().collect();
    tables.sort_by_key(|(cmap, _)| *cmap);

    for (cmap, table) in tables {
        let users: Vec<String> = report
            .fonts()
            .to_unicode_refs()
            .filter(|(_, target)| *target == cmap)
            .map(|(font, _)| font.to_string())
            .collect();

        println!("=== ToUnicode CMap at object {} ===", cmap);
        if !users.is_empty() {
            println!("used by {}", users.join(", "));
        }
        for (src, dst) in table.entries() {
            let shown = char::from_u32(u32::from(dst)).unwrap_or(char::REPLACEMENT_CHARACTER);
            println!("<{:04X}> <{:04X}> {}", src, dst, shown);
        }
        println!();
    }
}
