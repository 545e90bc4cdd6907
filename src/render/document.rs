//! Document-level markup: per-file sections and the optional standalone wrapper.

/// Heading that opens the documentation of one source file.
pub fn file_section(path: &str) -> String {
    format!("\\subsection{{Module \\texttt{{{path}}}}}\n")
}

/// Preamble of a complete LaTeX document.
///
/// `underscore` with the `strings` option lets C identifiers appear unescaped
/// inside `\texttt`.
pub fn preamble(title: Option<&str>) -> String {
    let mut out = String::from(
        "\\documentclass[a4paper]{article}\n\
         \\usepackage[utf8]{inputenc}\n\
         \\usepackage[T1]{fontenc}\n\
         \\usepackage[strings]{underscore}\n",
    );
    if let Some(title) = title {
        out.push_str(&format!("\\title{{{title}}}\n\\date{{}}\n"));
    }
    out.push_str("\\begin{document}\n");
    if title.is_some() {
        out.push_str("\\maketitle\n");
    }
    out.push_str("\\section{Documentation}\n");
    out
}

pub fn postamble() -> &'static str {
    "\\end{document}\n"
}
