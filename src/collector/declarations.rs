//! Declaration extraction
//!
//! Turns the captures of a file's declarations query into `NamespaceEntry`s.
//! Captures are related by span: a name belongs to the smallest definition
//! node enclosing it, and bases/accessors attach to the innermost type.

use crate::language::LanguageProfile;
use crate::namespace::{Accessor, NamespaceEntry};
use crate::syntax::Capture;

/// A definition node paired with its name capture
struct Named<'c> {
    definition: &'c Capture,
    name: &'c Capture,
}

/// Pair every name capture with the smallest definition capture enclosing it
fn pair_names<'c>(captures: &'c [Capture], definition: &str, name: &str) -> Vec<Named<'c>> {
    let definitions: Vec<&Capture> = captures.iter().filter(|c| c.name == definition).collect();

    captures
        .iter()
        .filter(|c| c.name == name)
        .filter_map(|name_capture| {
            definitions
                .iter()
                .filter(|d| d.encloses(name_capture.start_byte))
                .min_by_key(|d| d.span_len())
                .map(|d| Named {
                    definition: *d,
                    name: name_capture,
                })
        })
        .collect()
}

/// Index of the innermost definition enclosing a byte offset
fn innermost(definitions: &[Named<'_>], byte: usize) -> Option<usize> {
    definitions
        .iter()
        .enumerate()
        .filter(|(_, d)| d.definition.encloses(byte))
        .min_by_key(|(_, d)| d.definition.span_len())
        .map(|(i, _)| i)
}

/// C# convention: interfaces are named `I` followed by an uppercase letter
fn looks_like_interface(name: &str) -> bool {
    let simple = name.rsplit('.').next().unwrap_or(name);
    let mut chars = simple.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('I'), Some(second)) if second.is_ascii_uppercase()
    )
}

/// Strip nullability and array decorations from a declared return type
fn clean_return_type(text: &str, profile: &LanguageProfile) -> String {
    let mut cleaned = text.trim().trim_start_matches('?');
    for suffix in profile.strip_suffixes {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped;
            break;
        }
    }
    match cleaned {
        "void" | "mixed" | "never" => String::new(),
        other => other.to_string(),
    }
}

/// Extract the declared types of one file.
///
/// A file declaring nothing yields an empty list.
pub fn extract_declarations(
    captures: &[Capture],
    profile: &LanguageProfile,
    source: &str,
) -> Vec<NamespaceEntry> {
    let delimiter = profile.namespace_delimiter;
    let namespaces = pair_names(captures, "namespace_definition", "namespace_definition_name");
    let types = pair_names(captures, "class_definition", "class_name");
    let accessors = pair_names(captures, "accessor_definition", "accessor_name");

    if types.is_empty() {
        return Vec::new();
    }

    let file_namespaces: Vec<&Capture> = captures
        .iter()
        .filter(|c| c.name == "file_namespace_name")
        .collect();

    let mut entries: Vec<NamespaceEntry> = types
        .iter()
        .map(|ty| {
            let start = ty.definition.start_byte;
            let mut parts: Vec<&str> = Vec::new();

            if let Some(file_ns) = file_namespaces.iter().filter(|c| c.start_byte < start).last() {
                parts.push(file_ns.text.trim());
            }

            let mut blocks: Vec<&Named<'_>> = namespaces
                .iter()
                .filter(|ns| ns.definition.encloses(start))
                .collect();
            blocks.sort_by_key(|ns| ns.definition.start_byte);
            parts.extend(blocks.iter().map(|ns| ns.name.text.trim()));

            let namespace = parts.join(delimiter);
            NamespaceEntry::new(
                namespace,
                ty.name.text.trim(),
                delimiter,
                source,
                profile.id,
            )
        })
        .collect();

    // inheritance
    let mut base_seen = vec![false; entries.len()];
    for capture in captures {
        let kind = capture.name.as_str();
        if !matches!(kind, "extended_class" | "implemented_class" | "base_class") {
            continue;
        }
        let Some(owner) = innermost(&types, capture.start_byte) else {
            continue;
        };
        let name = capture.text.trim().to_string();
        let entry = &mut entries[owner];

        match kind {
            "extended_class" => entry.extended_class = Some(name),
            "implemented_class" => entry.implemented_classes.push(name),
            _ => {
                let first = !base_seen[owner];
                base_seen[owner] = true;
                if first && !looks_like_interface(&name) {
                    entry.extended_class = Some(name);
                } else {
                    entry.implemented_classes.push(name);
                }
            }
        }
    }

    // public accessors
    for (index, accessor) in accessors.iter().enumerate() {
        let Some(owner) = innermost(&types, accessor.definition.start_byte) else {
            continue;
        };
        let return_type = captures
            .iter()
            .filter(|c| c.name == "accessor_return_type")
            .filter(|c| innermost(&accessors, c.start_byte) == Some(index))
            .map(|c| clean_return_type(&c.text, profile))
            .next()
            .unwrap_or_default();

        let entry = &mut entries[owner];
        let name = accessor.name.text.trim();
        if entry.accessors.iter().any(|a| a.name == name) {
            continue;
        }
        entry
            .accessors
            .push(Accessor::new(name, entry.fqtn.clone(), return_type, source));
    }

    tracing::debug!(
        "{}: {} declarations ({})",
        source,
        entries.len(),
        entries.iter().map(|e| e.fqtn.as_str()).collect::<Vec<_>>().join(", ")
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::csharp;
    use crate::language::php;

    fn cap(name: &str, text: &str, start: usize, end: usize) -> Capture {
        Capture::new(name, text, 1, start, end)
    }

    #[test]
    fn test_zero_declarations() {
        let profile = csharp::profile();
        let captures = vec![cap("file_namespace_name", "Scripts", 10, 17)];

        assert!(extract_declarations(&captures, &profile, "script.cs").is_empty());
    }

    #[test]
    fn test_nested_block_namespaces() {
        let profile = csharp::profile();
        // namespace Outer { namespace Inner { class Foo {} } class Bar {} }
        let captures = vec![
            cap("namespace_definition", "...", 0, 100),
            cap("namespace_definition_name", "Outer", 10, 15),
            cap("namespace_definition", "...", 18, 60),
            cap("namespace_definition_name", "Inner", 28, 33),
            cap("class_definition", "class Foo {}", 36, 48),
            cap("class_name", "Foo", 42, 45),
            cap("class_definition", "class Bar {}", 62, 74),
            cap("class_name", "Bar", 68, 71),
        ];

        let entries = extract_declarations(&captures, &profile, "Foo.cs");
        let fqtns: Vec<_> = entries.iter().map(|e| e.fqtn.as_str()).collect();

        assert_eq!(fqtns, vec!["Outer.Inner.Foo", "Outer.Bar"]);
        assert_eq!(entries[0].namespace, "Outer.Inner");
        assert_eq!(entries[0].source, "Foo.cs");
    }

    #[test]
    fn test_file_scoped_namespace() {
        let profile = php::profile();
        let captures = vec![
            cap("file_namespace_name", "App\\Models", 16, 26),
            cap("class_definition", "class User {}", 30, 43),
            cap("class_name", "User", 36, 40),
        ];

        let entries = extract_declarations(&captures, &profile, "User.php");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fqtn, "App\\Models\\User");
        assert_eq!(entries[0].namespace_delimiter, "\\");
    }

    #[test]
    fn test_type_outside_namespace() {
        let profile = csharp::profile();
        let captures = vec![
            cap("class_definition", "class Program {}", 0, 16),
            cap("class_name", "Program", 6, 13),
        ];

        let entries = extract_declarations(&captures, &profile, "Program.cs");
        assert_eq!(entries[0].fqtn, "Program");
        assert_eq!(entries[0].namespace, "");
    }

    #[test]
    fn test_base_list_split() {
        let profile = csharp::profile();
        // class Repo : Base, IRepository, IDisposable {}  /  class Handler : IHandler {}
        let captures = vec![
            cap("class_definition", "...", 0, 60),
            cap("class_name", "Repo", 6, 10),
            cap("base_class", "Base", 13, 17),
            cap("base_class", "IRepository", 19, 30),
            cap("base_class", "IDisposable", 32, 43),
            cap("class_definition", "...", 70, 110),
            cap("class_name", "Handler", 76, 83),
            cap("base_class", "IHandler", 86, 94),
        ];

        let entries = extract_declarations(&captures, &profile, "Repo.cs");

        assert_eq!(entries[0].extended_class.as_deref(), Some("Base"));
        assert_eq!(entries[0].implemented_classes, vec!["IRepository", "IDisposable"]);
        assert_eq!(entries[1].extended_class, None);
        assert_eq!(entries[1].implemented_classes, vec!["IHandler"]);
    }

    #[test]
    fn test_explicit_extends_and_implements() {
        let profile = php::profile();
        let captures = vec![
            cap("class_definition", "...", 0, 80),
            cap("class_name", "Admin", 6, 11),
            cap("extended_class", "User", 20, 24),
            cap("implemented_class", "Auditable", 36, 45),
        ];

        let entries = extract_declarations(&captures, &profile, "Admin.php");

        assert_eq!(entries[0].extended_class.as_deref(), Some("User"));
        assert_eq!(entries[0].implemented_classes, vec!["Auditable"]);
    }

    #[test]
    fn test_accessors_attach_to_innermost_type() {
        let profile = csharp::profile();
        // class Outer { public Foo Get() {} class Inner { public Bar? Make() {} public void Run() {} } }
        let captures = vec![
            cap("class_definition", "...", 0, 200),
            cap("class_name", "Outer", 6, 11),
            cap("accessor_definition", "...", 14, 40),
            cap("accessor_return_type", "Foo", 21, 24),
            cap("accessor_name", "Get", 25, 28),
            cap("class_definition", "...", 50, 190),
            cap("class_name", "Inner", 56, 61),
            cap("accessor_definition", "...", 64, 90),
            cap("accessor_return_type", "Bar?", 71, 75),
            cap("accessor_name", "Make", 76, 80),
            cap("accessor_definition", "...", 100, 130),
            cap("accessor_return_type", "void", 107, 111),
            cap("accessor_name", "Run", 112, 115),
        ];

        let entries = extract_declarations(&captures, &profile, "Outer.cs");

        assert_eq!(entries[0].accessors.len(), 1);
        assert_eq!(entries[0].accessors[0].name, "Get");
        assert_eq!(entries[0].accessors[0].return_type, "Foo");

        let inner = &entries[1].accessors;
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0].return_type, "Bar");
        assert_eq!(inner[0].declaring_types, vec!["Inner"]);
        // no followable return type, still recorded
        assert_eq!(inner[1].name, "Run");
        assert!(!inner[1].has_return_type());
    }

    #[test]
    fn test_interface_naming_convention() {
        assert!(looks_like_interface("IDisposable"));
        assert!(looks_like_interface("System.IDisposable"));
        assert!(!looks_like_interface("Item"));
        assert!(!looks_like_interface("I"));
    }
}
