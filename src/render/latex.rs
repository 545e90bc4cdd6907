//! LaTeX field blocks for functions, structures and variables.
//!
//! Every operation emits the header and then one block per present field,
//! releasing each field as soon as it has been written. Fields that have no
//! meaning for a declaration kind (parameters and return value of a structure
//! or variable) are released without output.

use super::Drained;
use crate::list::ListSlot;
use crate::model::{CommentRecord, DeclKind, Parameter};
use std::borrow::Cow;

/// Function names longer than this are broken into chunks of this many characters.
pub const NAME_COLUMN_LIMIT: usize = 40;

/// Separator inserted between name chunks.
pub const NAME_BREAK: &str = "\\newline ";

const LINE_BREAK: &str = "\\\\\n";
const BLOCK_START: &str = "\\par\\noindent\n";

/// `\verb` delimiters in order of preference.
const VERB_DELIMITERS: [char; 6] = ['"', '|', '!', '+', '@', '#'];

/// Render a function: header, brief, arguments, return value, details, author, version.
pub fn render_function(name: &str, record: &mut CommentRecord, out: &mut String) -> Drained {
    let mut drained = Drained::default();
    header(out, DeclKind::Function, &wrap_name(name));
    brief_block(record, out, &mut drained);

    if let Some(params) = &record.params {
        out.push_str(BLOCK_START);
        out.push_str("\\textbf{Arguments:}");
        out.push_str(LINE_BREAK);
        params.for_each(|param| param_line(out, param));
    }
    drain_params(record, &mut drained);

    if let Some(ret) = record.return_tag.take() {
        out.push_str(BLOCK_START);
        out.push_str("\\textbf{Returns:} ");
        out.push_str(&term(&ret.ty, &ret.description));
        out.push_str(LINE_BREAK);
        drained.fields += 1;
    }

    details_block(record, out, &mut drained);
    author_block(record, out, &mut drained);
    version_block(record, out, &mut drained);
    drained
}

/// Render a structure: header, brief, details, author, version.
pub fn render_struct(name: &str, record: &mut CommentRecord, out: &mut String) -> Drained {
    render_plain(DeclKind::Struct, name, record, out)
}

/// Render a variable: header, brief, details, author, version.
pub fn render_variable(name: &str, record: &mut CommentRecord, out: &mut String) -> Drained {
    render_plain(DeclKind::Variable, name, record, out)
}

fn render_plain(
    kind: DeclKind,
    name: &str,
    record: &mut CommentRecord,
    out: &mut String,
) -> Drained {
    let mut drained = Drained::default();
    header(out, kind, name);
    brief_block(record, out, &mut drained);
    details_block(record, out, &mut drained);

    drain_params(record, &mut drained);
    if record.return_tag.take().is_some() {
        drained.fields += 1;
    }

    author_block(record, out, &mut drained);
    version_block(record, out, &mut drained);
    drained
}

fn header(out: &mut String, kind: DeclKind, name: &str) {
    out.push_str(&format!(
        "\\subsubsection{{{} \\texttt{{{}}}}}\n",
        kind.label(),
        name
    ));
}

fn brief_block(record: &mut CommentRecord, out: &mut String, drained: &mut Drained) {
    if let Some(brief) = record.brief.take() {
        labelled_line(out, "Brief", &brief);
        drained.fields += 1;
    }
}

fn details_block(record: &mut CommentRecord, out: &mut String, drained: &mut Drained) {
    if let Some(details) = &record.details {
        out.push_str(BLOCK_START);
        out.push_str("\\textbf{Details:} ");
        details.for_each(|line| {
            out.push_str(line);
            out.push('\n');
        });
        out.push_str(LINE_BREAK);
    }
    record.details.destroy_with(|_line| drained.detail_lines += 1);
}

fn author_block(record: &mut CommentRecord, out: &mut String, drained: &mut Drained) {
    if let Some(author) = record.author_tag.take() {
        labelled_line(out, "Author", &author);
        drained.fields += 1;
    }
}

fn version_block(record: &mut CommentRecord, out: &mut String, drained: &mut Drained) {
    if let Some(version) = record.version_tag.take() {
        labelled_line(out, "Version", &version);
        drained.fields += 1;
    }
}

fn drain_params(record: &mut CommentRecord, drained: &mut Drained) {
    record
        .params
        .destroy_with(|_param: Parameter| drained.params += 1);
}

fn labelled_line(out: &mut String, label: &str, text: &str) {
    out.push_str(BLOCK_START);
    out.push_str(&format!("\\textbf{{{label}:}} {text}"));
    out.push_str(LINE_BREAK);
}

fn param_line(out: &mut String, param: &Parameter) {
    out.push_str(&term(&param.signature, &param.description));
    out.push_str(LINE_BREAK);
}

/// Code-styled term followed by its description.
fn term(code: &str, description: &str) -> String {
    if description.is_empty() {
        verb(code)
    } else {
        format!("{} -- {}", verb(code), description)
    }
}

/// Wrap `text` in `\verb` with a delimiter that does not occur in it.
pub fn verb(text: &str) -> String {
    match VERB_DELIMITERS.iter().find(|d| !text.contains(**d)) {
        Some(d) => format!("\\verb{d}{text}{d}"),
        None => format!("\\texttt{{{}}}", escape(text)),
    }
}

/// Escape characters that are special in LaTeX text mode.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| "\\#$%&_{}~^".contains(c)) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Split `name` into chunks of at most `width` characters.
///
/// Always yields at least one chunk; only the last may be shorter than `width`.
pub fn name_chunks(name: &str, width: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (index, _)) in name.char_indices().enumerate() {
        if count > 0 && count % width == 0 {
            chunks.push(&name[start..index]);
            start = index;
        }
    }
    chunks.push(&name[start..]);
    chunks
}

/// Join the [`NAME_COLUMN_LIMIT`]-wide chunks of `name` with [`NAME_BREAK`].
pub fn wrap_name(name: &str) -> Cow<'_, str> {
    if name.chars().count() <= NAME_COLUMN_LIMIT {
        return Cow::Borrowed(name);
    }
    Cow::Owned(name_chunks(name, NAME_COLUMN_LIMIT).join(NAME_BREAK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReturnTag;

    fn full_record() -> CommentRecord {
        let mut record = CommentRecord::default();
        record.set_brief("Does X").unwrap();
        record.push_detail("First detail line.");
        record.push_detail("Second detail line.");
        record.push_param(Parameter::new("int n", "count"));
        record.push_param(Parameter::new("char* s", "label"));
        record.set_return(ReturnTag::new("int", "status")).unwrap();
        record.set_author("Jane Roe").unwrap();
        record.set_version("1.2.0").unwrap();
        record
    }

    /// Assert each needle occurs in `haystack` after the previous one.
    fn assert_in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            let pos = haystack[from..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing {:?} after byte {} in:\n{}", needle, from, haystack));
            from += pos + needle.len();
        }
    }

    #[test]
    fn function_scenario_emits_blocks_in_order() {
        let mut record = CommentRecord::default();
        record.set_brief("Does X").unwrap();
        record.push_param(Parameter::new("int n", "count"));
        record.set_return(ReturnTag::new("int", "status")).unwrap();

        let mut out = String::new();
        render_function("doit", &mut record, &mut out);

        assert_eq!(
            out,
            "\\subsubsection{Function \\texttt{doit}}\n\
             \\par\\noindent\n\\textbf{Brief:} Does X\\\\\n\
             \\par\\noindent\n\\textbf{Arguments:}\\\\\n\
             \\verb\"int n\" -- count\\\\\n\
             \\par\\noindent\n\\textbf{Returns:} \\verb\"int\" -- status\\\\\n"
        );
        assert!(record.is_empty());
    }

    #[test]
    fn function_orders_params_return_before_details() {
        let mut record = full_record();
        let mut out = String::new();
        let drained = render_function("int doit(int n, char* s)", &mut record, &mut out);

        assert_in_order(
            &out,
            &[
                "\\subsubsection{Function \\texttt{int doit(int n, char* s)}}",
                "\\textbf{Brief:} Does X",
                "\\textbf{Arguments:}",
                "\\verb\"int n\" -- count",
                "\\verb\"char* s\" -- label",
                "\\textbf{Returns:} \\verb\"int\" -- status",
                "\\textbf{Details:} First detail line.\nSecond detail line.\n",
                "\\textbf{Author:} Jane Roe",
                "\\textbf{Version:} 1.2.0",
            ],
        );
        assert_eq!(
            drained,
            Drained {
                params: 2,
                detail_lines: 2,
                fields: 4
            }
        );
        assert!(record.is_empty());
    }

    #[test]
    fn struct_drains_params_and_return_silently() {
        let mut record = full_record();
        let mut out = String::new();
        let drained = render_struct("list_t", &mut record, &mut out);

        assert!(!out.contains("Arguments"));
        assert!(!out.contains("Returns"));
        assert!(!out.contains("int n"));
        assert_in_order(
            &out,
            &[
                "\\subsubsection{Structure \\texttt{list_t}}",
                "\\textbf{Brief:} Does X",
                "\\textbf{Details:}",
                "\\textbf{Author:} Jane Roe",
                "\\textbf{Version:} 1.2.0",
            ],
        );
        assert_eq!(drained.params, 2);
        assert_eq!(drained.fields, 4);
        assert!(record.is_empty());
    }

    #[test]
    fn variable_uses_record_brief() {
        let mut record = CommentRecord::default();
        record.set_brief("My variable").unwrap();
        record.push_param(Parameter::new("int stray", "ignored"));

        let mut out = String::new();
        let drained = render_variable("int my_variable", &mut record, &mut out);

        assert_eq!(
            out,
            "\\subsubsection{Variable \\texttt{int my_variable}}\n\
             \\par\\noindent\n\\textbf{Brief:} My variable\\\\\n"
        );
        assert_eq!(drained.params, 1);
        assert!(record.is_empty());
    }

    #[test]
    fn empty_record_emits_header_only() {
        for kind in [DeclKind::Function, DeclKind::Struct, DeclKind::Variable] {
            let mut record = CommentRecord::default();
            let mut out = String::new();
            let drained = crate::render::render(kind, "x", &mut record, &mut out);
            assert_eq!(out.lines().count(), 1, "{kind:?}");
            assert_eq!(drained, Drained::default());
            assert!(record.is_empty());
        }
    }

    #[test]
    fn every_field_combination_is_drained() {
        for mask in 0u32..64 {
            for kind in [DeclKind::Function, DeclKind::Struct, DeclKind::Variable] {
                let mut record = CommentRecord::default();
                let mut expected = Drained::default();
                if mask & 1 != 0 {
                    record.set_brief("b").unwrap();
                    expected.fields += 1;
                }
                if mask & 2 != 0 {
                    record.push_detail("d1");
                    record.push_detail("d2");
                    expected.detail_lines += 2;
                }
                if mask & 4 != 0 {
                    for n in 0..3 {
                        record.push_param(Parameter::new(format!("int p{n}"), "p"));
                    }
                    expected.params += 3;
                }
                if mask & 8 != 0 {
                    record.set_return(ReturnTag::new("void", "")).unwrap();
                    expected.fields += 1;
                }
                if mask & 16 != 0 {
                    record.set_author("a").unwrap();
                    expected.fields += 1;
                }
                if mask & 32 != 0 {
                    record.set_version("v").unwrap();
                    expected.fields += 1;
                }

                let mut out = String::new();
                let drained = crate::render::render(kind, "name", &mut record, &mut out);
                assert_eq!(drained, expected, "mask {mask:#08b} {kind:?}");
                assert!(record.is_empty());

                record.clear();
                assert!(record.is_empty());
            }
        }
    }

    #[test]
    fn long_name_is_wrapped_into_chunks() {
        let name: String = ('a'..='z').cycle().take(81).collect();
        let wrapped = wrap_name(&name);
        let parts: Vec<&str> = wrapped.split(NAME_BREAK).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 40);
        assert_eq!(parts[1].len(), 40);
        assert_eq!(parts[2].len(), 1);
        assert_eq!(parts.concat(), name);
    }

    #[test]
    fn wrap_round_trip_for_boundary_lengths() {
        for len in [1usize, 39, 40, 41, 79, 80, 81, 123] {
            let name: String = "fn_".chars().chain(std::iter::repeat('x')).take(len).collect();
            let wrapped = wrap_name(&name);
            assert_eq!(wrapped.replace(NAME_BREAK, ""), name);
            assert_eq!(
                wrapped.matches(NAME_BREAK).count() + 1,
                len.div_ceil(NAME_COLUMN_LIMIT)
            );
            assert!(wrapped.split(NAME_BREAK).all(|c| c.chars().count() <= NAME_COLUMN_LIMIT));
        }
    }

    #[test]
    fn name_chunks_respect_char_boundaries() {
        let name = "ž".repeat(45);
        let chunks = name_chunks(&name, NAME_COLUMN_LIMIT);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 40);
        assert_eq!(chunks[1].chars().count(), 5);
        assert_eq!(name_chunks("", 40), vec![""]);
    }

    #[test]
    fn function_header_wraps_long_prototype() {
        let name = "list_t* list_new_with_a_rather_long_name(void* object)";
        let mut record = CommentRecord::default();
        let mut out = String::new();
        render_function(name, &mut record, &mut out);
        assert_eq!(
            out,
            "\\subsubsection{Function \\texttt{list_t* list_new_with_a_rather_long_name(\\newline void* object)}}\n"
        );
    }

    #[test]
    fn verb_picks_unused_delimiter() {
        assert_eq!(verb("int n"), "\\verb\"int n\"");
        assert_eq!(verb("char* s = \"x\""), "\\verb|char* s = \"x\"|");
        assert_eq!(verb("\"|!+@#"), "\\texttt{\"|!+@\\#}");
    }

    #[test]
    fn texttt_fallback_escapes_special_characters() {
        let text = r#"map{"a|b"}!+@#_%&\x"#;
        assert_eq!(
            verb(text),
            r#"\texttt{map\{"a|b"\}!+@\#\_\%\&\textbackslash{}x}"#
        );
    }

    #[test]
    fn escape_leaves_plain_text_borrowed() {
        assert!(matches!(escape("int n"), Cow::Borrowed("int n")));
        assert_eq!(escape("a~b^c$"), "a\\textasciitilde{}b\\textasciicircum{}c\\$");
    }
}
