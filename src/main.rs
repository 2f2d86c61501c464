use std::fs;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use itertools::Itertools;
use log::debug;
use treediff::{diff, formatter, DiffSettings};

use treediff::parser::{build_tree, Format};
use treediff::printer::{AnsiPrinter, PlainPrinter, Printer};

/// Computes and prints the minimum-cost structural diff between two
/// semi-structured documents.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Path to the "from" document
    from_file: PathBuf,
    /// Path to the "to" document
    to_file: PathBuf,

    /// Format of the "from" document; inferred from its extension if omitted
    #[arg(long = "from-format")]
    from_format: Option<String>,
    /// Format of the "to" document; inferred from its extension if omitted
    #[arg(long = "to-format")]
    to_format: Option<String>,

    /// Disable matching differing mapping keys to one another
    #[arg(long)]
    no_key_edits: bool,
    /// Disable the full sequence aligner; lists are diffed positionally
    #[arg(long)]
    no_list_edits: bool,
    /// Disable recursive edit distance between list elements
    #[arg(long)]
    no_list_edit_distance: bool,
    /// Force colorized output even when not writing to a terminal
    #[arg(long)]
    color: bool,
    /// Force plain output with no ANSI styling
    #[arg(long)]
    no_color: bool,
    /// Render all-`Match` list compounds on a single line
    #[arg(long)]
    join_lists: bool,
    /// Render all-`Match` mapping compounds on a single line
    #[arg(long)]
    join_dict_items: bool,
}

fn main() {
    let args = CliArgs::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(if args.verbose { 3 } else { 2 })
        .init()
        .unwrap();

    exit(real_main(args));
}

fn detect_format(explicit: Option<&str>, path: &std::path::Path) -> Result<Format, i32> {
    let name = explicit
        .map(str::to_string)
        .or_else(|| path.extension().map(|e| e.to_string_lossy().to_string()));
    match name.as_deref().and_then(Format::parse_name) {
        Some(format) => Ok(format),
        None => {
            eprintln!(
                "treediff: could not determine a format for {} (pass --from-format/--to-format explicitly; supported formats: {})",
                path.display(),
                Format::all().iter().map(|f| f.name()).join(", ")
            );
            Err(2)
        }
    }
}

fn real_main(args: CliArgs) -> i32 {
    let from_format = match detect_format(args.from_format.as_deref(), &args.from_file) {
        Ok(f) => f,
        Err(code) => return code,
    };
    let to_format = match detect_format(args.to_format.as_deref(), &args.to_file) {
        Ok(f) => f,
        Err(code) => return code,
    };

    let from_contents = match fs::read_to_string(&args.from_file) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("treediff: could not read {}: {err}", args.from_file.display());
            return 1;
        }
    };
    let to_contents = match fs::read_to_string(&args.to_file) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("treediff: could not read {}: {err}", args.to_file.display());
            return 1;
        }
    };

    let from_tree = match build_tree(from_format, &from_contents, Some(&args.from_file)) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("treediff: {err}");
            return 1;
        }
    };
    let to_tree = match build_tree(to_format, &to_contents, Some(&args.to_file)) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("treediff: {err}");
            return 1;
        }
    };

    let settings = DiffSettings {
        allow_key_edits: !args.no_key_edits,
        allow_list_edits: !args.no_list_edits,
        allow_list_edit_distance: !args.no_list_edit_distance,
        color: args.color || !args.no_color,
        join_lists: args.join_lists,
        join_dict_items: args.join_dict_items,
    };

    debug!("diffing {} against {}", args.from_file.display(), args.to_file.display());

    let edit = match diff(std::rc::Rc::new(from_tree), std::rc::Rc::new(to_tree), &settings) {
        Ok(edit) => edit,
        Err(err) => {
            eprintln!("treediff: {err}");
            return 1;
        }
    };

    let use_color = settings.color && !args.no_color;
    let rendered = if use_color {
        let mut printer = AnsiPrinter::new(false);
        formatter::format_edit(&edit, &settings, &mut printer);
        printer.finish()
    } else {
        let mut printer = PlainPrinter::new();
        formatter::format_edit(&edit, &settings, &mut printer);
        printer.finish()
    };
    println!("{rendered}");

    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn unknown_format_is_a_usage_error() {
        let args = CliArgs {
            verbose: false,
            from_file: PathBuf::from("a.bogus"),
            to_file: PathBuf::from("b.bogus"),
            from_format: None,
            to_format: None,
            no_key_edits: false,
            no_list_edits: false,
            no_list_edit_distance: false,
            color: false,
            no_color: false,
            join_lists: false,
            join_dict_items: false,
        };
        assert_eq!(real_main(args), 2);
    }
}
