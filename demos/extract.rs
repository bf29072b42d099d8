use std::cell::Cell;
use std::env;
use std::rc::Rc;

fn main() {
    simple_logger::SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file>", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];

    // The log records already carry every diagnostic; the sink only counts them.
    let messages = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&messages);
    let output = pdf_cmap_strings::PdfExtractor::builder()
        .sink(move |_: &str| counter.set(counter.get() + 1))
        .build()
        .from_path(path);

    match output {
        Ok(text_output) => {
            println!("=== Fragments (via Display) ===\n");
            print!("{}", text_output);

            println!("\n=== Joined Text ===\n");
            println!("{}", text_output.joined());

            println!("\n=== Structured Data Access ===\n");
            for fragment in text_output.fragments().iter().take(10) {
                println!(
                    "  #{} font {}: {:?}",
                    fragment.sequence, fragment.font, fragment.text
                );
            }
            println!("\n{} diagnostics", messages.get());
        }
        Err(e) => {
            eprintln!("Error extracting text: {}", e);
            std::process::exit(1);
        }
    }
}
