//! Extension-based language classification and review guidelines

/// Map a file extension (lowercase, no dot) to a language name used for
/// grouping and prompt selection. Unknown extensions map to `"Unknown"`.
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext {
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "py" => "Python",
        "rb" => "Ruby",
        "go" => "Go",
        "rs" => "Rust",
        "java" => "Java",
        "kt" | "kts" => "Kotlin",
        "swift" => "Swift",
        "c" | "h" => "C",
        "cpp" | "cc" | "cxx" | "hpp" => "C++",
        "cs" => "C#",
        "php" => "PHP",
        "sh" | "bash" => "Shell",
        "sql" => "SQL",
        "html" | "htm" => "HTML",
        "css" | "scss" | "less" => "CSS",
        "json" => "JSON",
        "yml" | "yaml" => "YAML",
        "toml" => "TOML",
        "md" => "Markdown",
        _ => "Unknown",
    }
}

/// Language-specific review guidance appended to the generic instruction
/// set. Unmapped languages fall back to a generic guideline.
pub fn guidelines_for_language(language: &str) -> &'static str {
    match language {
        "JavaScript" => {
            "Watch for unhandled promise rejections, implicit type coercion, \
             prototype pollution, and missing input validation."
        }
        "TypeScript" => {
            "Watch for unsafe `any` usage, unchecked type assertions, and \
             places where narrowing is bypassed."
        }
        "Python" => {
            "Watch for mutable default arguments, broad `except` clauses, \
             and unclosed resources outside context managers."
        }
        "Rust" => {
            "Watch for unnecessary clones, `unwrap` on fallible paths, and \
             lifetimes papered over with owned copies."
        }
        "Go" => {
            "Watch for ignored error returns, goroutine leaks, and data \
             races on shared state."
        }
        "Java" => {
            "Watch for resource leaks outside try-with-resources, nullability \
             gaps, and equals/hashCode inconsistencies."
        }
        "SQL" => {
            "Watch for injection-prone string concatenation, missing indexes \
             implied by new predicates, and unbatched writes."
        }
        "Shell" => {
            "Watch for unquoted expansions, missing `set -e` pipelines, and \
             word-splitting surprises."
        }
        _ => {
            "Apply general code-review judgment: correctness, error handling, \
             readability, and obvious performance or security hazards."
        }
    }
}
