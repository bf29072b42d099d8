use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One extracted fragment per line
    Lines,
    /// The whole document text with fragments concatenated
    Joined,
    /// Sequence id, font and quoted text of every fragment
    Debug,
}

#[derive(Parser)]
#[command(name = "pdf-cmap-strings")]
#[command(about = "Extract text from PDF files with CID/ToUnicode or Shift-JIS fonts", long_about = None)]
struct Args {
    /// PDF file to extract text from
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Lines)]
    format: OutputFormat,

    /// Print scan and resolution diagnostics to stderr
    #[arg(long)]
    trace: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return;
        }
    };

    if !args.file.exists() {
        eprintln!("file not found: {}", args.file.display());
        return;
    }

    let extractor = if args.trace {
        pdf_cmap_strings::PdfExtractor::builder()
            .sink(|m: &str| eprintln!("{}", m))
            .build()
    } else {
        pdf_cmap_strings::PdfExtractor::default()
    };

    let output = match extractor.from_path(&args.file) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error extracting text from {:?}: {}", args.file, e);
            return;
        }
    };

    match args.format {
        OutputFormat::Lines => {
            print!("{}", output);
        }
        OutputFormat::Joined => {
            println!("{}", output.joined());
        }
        OutputFormat::Debug => {
            for fragment in output.fragments() {
                println!(
                    "#{} {}: {:?}",
                    fragment.sequence, fragment.font, fragment.text
                );
            }
        }
    }
}
