/// cli/src/output.rs
/// description: styled diagnostics and the `--stats` table.

use std::io::{self, Write};

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::Style;
use pyll_core::{IrModule, Level, PyllErrorExt};

/// Styles for the different kinds of CLI output.
pub struct FormatStyle {
    pub error: Style,
    pub warning: Style,
    pub info: Style,
    pub success: Style,
    pub location: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            error: Style::new().red().bold(),
            warning: Style::new().yellow(),
            info: Style::new().cyan(),
            success: Style::new().green().bold(),
            location: Style::new().blue(),
        }
    }
}

/// Render one error as
/// ```text
/// error[pyll.lower.unsupported-construct]: Compiler doesn't support "Div" operator.
///   --> 3:11
/// ```
pub fn render_error(err: &dyn PyllErrorExt, formatting: &FormatStyle) -> String {
    let (label, style) = match err.level() {
        Level::Info => ("info", &formatting.info),
        Level::Warning => ("warning", &formatting.warning),
        Level::Error => ("error", &formatting.error),
        Level::Critical => ("internal error", &formatting.error),
    };
    let mut rendered = format!(
        "{}: {}",
        style.apply_to(format!("{}[{}]", label, err.issuer())),
        err.message()
    );
    if let Some(loc) = err.location() {
        rendered.push_str(&format!("\n  {} {}", formatting.location.apply_to("-->"), loc));
    }
    rendered
}

pub fn print_error(err: &dyn PyllErrorExt) {
    eprintln!("{}", render_error(err, &FormatStyle::default()));
}

pub fn print_success<T: Write>(out: &mut T, message: &str) -> io::Result<()> {
    writeln!(out, "{}", FormatStyle::default().success.apply_to(message))
}

/// The value an interpreted function returned, kept off stdout so the
/// program's own output stays clean.
pub fn print_result<T: Write>(out: &mut T, function: &str, value: i32) -> io::Result<()> {
    writeln!(out, "{}", FormatStyle::default().info.apply_to(format!("@{} returned {}", function, value)))
}

/// Per-function summary of a lowered module.
pub fn stats_table(module: &IrModule) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["function", "kind", "params", "blocks", "instructions", "slots"]);

    for (_, func) in module.functions() {
        let kind = if func.is_declaration() { "declare" } else { "define" };
        table.add_row(vec![
            Cell::new(format!("@{}", func.name)),
            Cell::new(kind),
            Cell::new(func.signature.arity),
            Cell::new(func.blocks.len()),
            Cell::new(func.instruction_count()),
            Cell::new(func.slots.len()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyll_core::ast::build::*;
    use pyll_core::{lower_ast_to_ir, LowerOptions, LoweringError, LoweringErrorKind, Location};

    #[test]
    fn error_rendering_includes_issuer_and_location() {
        let err = LoweringError::new(LoweringErrorKind::UnboundName, "Name 'y' is not defined.".to_string())
            .at(&name("y").with_location(Location::at(4, 2)));
        let plain = FormatStyle {
            error: Style::new(),
            warning: Style::new(),
            info: Style::new(),
            success: Style::new(),
            location: Style::new(),
        };
        let rendered = console::strip_ansi_codes(&render_error(&err, &plain)).to_string();
        assert!(rendered.starts_with("error[pyll.lower."), "{}", rendered);
        assert!(rendered.ends_with("Name 'y' is not defined.\n  --> 4:2"), "{}", rendered);
    }

    #[test]
    fn result_line_names_the_function() {
        let mut out = Vec::new();
        print_result(&mut out, "count", -3).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert_eq!(console::strip_ansi_codes(&rendered), "@count returned -3\n");
    }

    #[test]
    fn stats_table_lists_every_function() {
        let tree = module(vec![def("f", &["a", "b"], vec![assign("t", name("a")), ret(name("t"))])]);
        let ir = lower_ast_to_ir(&tree, &LowerOptions::default()).unwrap();
        let rendered = stats_table(&ir).to_string();
        for name in ["@print", "@main", "@f", "declare", "define"] {
            assert!(rendered.contains(name), "{} missing from\n{}", name, rendered);
        }
    }
}
