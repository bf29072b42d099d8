use std::collections::HashMap;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file>", args[0]);
        process::exit(1);
    }

    let path = &args[1];

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading PDF: {}", e);
            process::exit(1);
        }
    };

    let report = pdf_cmap_strings::PdfExtractor::default().scan(&bytes);
    if !report.header_accepted() {
        eprintln!("{} does not start with a PDF header", path);
        process::exit(1);
    }

    let fonts = report.fonts();
    let mut resources: Vec<_> = fonts.resources().collect();
    if resources.is_empty() {
        println!("No fonts found in document.");
        return;
    }
    resources.sort_by_key(|(name, _)| name.to_string());

    let mut usage: HashMap<&str, usize> = HashMap::new();
    for fragment in report.fragments() {
        if let Some(font) = fragment.font.as_deref() {
            *usage.entry(font).or_insert(0) += 1;
        }
    }

    println!("Fonts found in {}:\n", path);
    for (name, font) in resources {
        let encoding = match fonts.to_unicode(font) {
            _ if fonts.is_shift_jis(font) => "Shift-JIS".to_string(),
            Some(cmap) => match report.cmaps().get(cmap) {
                Some(table) => format!("ToUnicode {} ({} codes)", cmap, table.len()),
                None => format!("ToUnicode {} (not found)", cmap),
            },
            None => "UTF-16BE".to_string(),
        };
        println!(
            "  {} -> {}: {} (used in {} fragments)",
            name,
            font,
            encoding,
            usage.get(name).copied().unwrap_or(0)
        );
    }
}
