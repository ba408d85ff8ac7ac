use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use massalign::{AlignmentNode, DocumentAlignment};

/// Plain-text listing of every aligned paragraph group and the sentence
/// groups inside it. Writes to stdout when `path` is `None`.
pub fn write_listing(path: Option<&Path>, alignment: &DocumentAlignment) -> Result<(), String> {
    let target = path.map_or_else(|| "<stdout>".to_string(), |p| p.display().to_string());
    let mut out: Box<dyn Write> = match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| {
                    format!(
                        "Failed to create listing output directory '{}': {err}",
                        parent.display()
                    )
                })?;
            }
            let file = File::create(path).map_err(|err| {
                format!("Failed to create listing file '{}': {err}", path.display())
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    render(&mut out, alignment)
        .and_then(|()| out.flush())
        .map_err(|err| format!("Failed to write listing '{target}': {err}"))
}

fn render(out: &mut dyn Write, alignment: &DocumentAlignment) -> io::Result<()> {
    for pair in &alignment.paragraph_pairs {
        writeln!(out, "== paragraphs {}", describe(&pair.paragraph_node))?;
        for (node, sentences) in pair.sentence_path.iter().zip(pair.aligned_sentences()) {
            writeln!(out, "  -- sentences {}", describe(node))?;
            writeln!(out, "     S: {}", sentences.source)?;
            writeln!(out, "     T: {}", sentences.target)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn describe(node: &AlignmentNode) -> String {
    format!("{:?} <-> {:?}", node.source, node.target)
}
