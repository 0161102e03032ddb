//! Terminal output formatting.

use colored::Colorize;
use lre_core::presenter::{Block, BlockKind, Presentation, ResultView, EXPLANATION_TITLE, PLACEHOLDER};

/// Print one tab of a result, or the placeholder.
pub fn print_presentation(presentation: &Presentation, with_footer: bool) {
    match presentation {
        Presentation::Placeholder => println!("{}", PLACEHOLDER.dimmed()),
        Presentation::Ready(view) => print_view(view, with_footer),
    }
}

fn print_view(view: &ResultView, with_footer: bool) {
    println!("{}", view.active.label().to_uppercase().cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    if !view.missing.is_empty() {
        println!(
            "{} Resposta parcial, campos ausentes: {}",
            "!".yellow().bold(),
            view.missing.join(", ").yellow()
        );
        println!();
    }

    for block in &view.blocks {
        print_block(block);
        println!();
    }

    if with_footer && !view.explanation.is_empty() {
        println!("{}", EXPLANATION_TITLE.bold());
        println!("{}", view.explanation.italic());
        println!();
    }
}

fn print_block(block: &Block) {
    match block.kind {
        BlockKind::Row => {
            println!("{}: {}", block.title.bold(), block.text);
            return;
        }
        BlockKind::Code => {
            println!("{}", block.title.bold());
            println!("{}", block.text.dimmed());
            return;
        }
        _ => {}
    }

    println!("{}", block.title.bold());
    match block.kind {
        BlockKind::Swatches => {
            for swatch in &block.swatches {
                let chip = match hex_to_rgb(&swatch.css) {
                    Some((r, g, b)) => "    ".on_truecolor(r, g, b).to_string(),
                    None => "    ".to_string(),
                };
                println!("  {} {}", chip, swatch.code);
            }
        }
        BlockKind::Prose => println!("  {}", block.text),
        BlockKind::Checklist => {
            for item in &block.items {
                println!("  {} {}", "✓".green(), item);
            }
        }
        BlockKind::Bullets => {
            for item in &block.items {
                println!("  {} {}", "•".cyan(), item);
            }
        }
        BlockKind::Quotes => {
            for item in &block.items {
                println!("  \"{}\"", item);
            }
        }
        BlockKind::Positions => {
            for item in &block.items {
                println!("  {}", item.dimmed());
            }
        }
        BlockKind::Files => {
            for item in &block.items {
                println!("  {} {}", "▸".dimmed(), item.cyan());
            }
        }
        BlockKind::Row | BlockKind::Code => {}
    }
}

/// Parse `#RGB` or `#RRGGBB` into its channels.
fn hex_to_rgb(code: &str) -> Option<(u8, u8, u8)> {
    let hex = code.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let mut parts = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some((parts.next()??, parts.next()??, parts.next()??))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#0A2540"), Some((0x0a, 0x25, 0x40)));
        assert_eq!(hex_to_rgb("#fff"), Some((255, 255, 255)));
        assert_eq!(hex_to_rgb(" #C9A43F "), Some((0xc9, 0xa4, 0x3f)));
    }

    #[test]
    fn test_hex_to_rgb_rejects_non_hex() {
        assert_eq!(hex_to_rgb("transparent"), None);
        assert_eq!(hex_to_rgb("#12"), None);
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("0A2540"), None);
    }
}
