//! Write a small sample document.
//!
//! Usage:
//!   cargo run --bin hello_pdf
//!   cargo run --bin hello_pdf -- --output out.pdf --font /path/to/font.ttf --no-compress

use pdf_forge::{
    Align, Color, DocumentInfo, DocumentOptions, FillRule, PdfDocument, Result, TextOptions,
};
use std::path::PathBuf;
use std::time::Instant;

struct DemoConfig {
    output: PathBuf,
    font: Option<PathBuf>,
    compress: bool,
}

impl DemoConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut output = PathBuf::from("hello.pdf");
        let mut font = None;
        let mut compress = true;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        output = PathBuf::from(&args[i]);
                    }
                },
                "--font" => {
                    i += 1;
                    if i < args.len() {
                        font = Some(PathBuf::from(&args[i]));
                    }
                },
                "--no-compress" => {
                    compress = false;
                },
                other => {
                    log::warn!("ignoring unknown argument {}", other);
                },
            }
            i += 1;
        }

        Self {
            output,
            font,
            compress,
        }
    }
}

const PARAGRAPH: &str = "Objects are written to the output as soon as they are finished, \
so only the open pages stay in memory. Text is broken at Unicode line break \
opportunities and flows across columns and pages.";

fn build(config: &DemoConfig) -> Result<()> {
    let options = DocumentOptions::default()
        .with_compress(config.compress)
        .with_info(DocumentInfo::default().title("Hello").author("pdf_forge"));
    let mut doc = PdfDocument::new(options)?;

    doc.font("Helvetica-Bold")?
        .font_size(24.0)
        .text("Hello, World!", None, TextOptions::new())?;
    doc.move_down(0.5);

    doc.font("Times-Roman")?.font_size(12.0).text(
        PARAGRAPH,
        None,
        TextOptions::new()
            .with_align(Align::Justify)
            .with_paragraph_gap(12.0),
    )?;

    doc.text(
        &PARAGRAPH.repeat(3),
        None,
        TextOptions::new().with_columns(2).with_height(120.0),
    )?;

    if let Some(path) = &config.font {
        doc.font(path.clone())?
            .font_size(14.0)
            .text("Embedded: ½ ≠ ∞ «Grüße»", None, TextOptions::new())?;
    }

    doc.save()?
        .rounded_rect(72.0, 500.0, 200.0, 80.0, 10.0)?
        .fill_color(Color::Hex("#3366cc".to_string()))?
        .fill_opacity(0.4)?
        .fill(FillRule::NonZero)?
        .restore()?;

    doc.fill_color("#000000")?.text(
        "Visit the project page",
        Some((72.0, 620.0)),
        TextOptions::new()
            .with_underline(true)
            .with_link("https://example.com"),
    )?;

    doc.write_to_file(&config.output)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let config = DemoConfig::from_args();
    let start = Instant::now();
    match build(&config) {
        Ok(()) => println!(
            "Wrote {} in {:.1} ms",
            config.output.display(),
            start.elapsed().as_secs_f64() * 1000.0
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
