/// Fixed reply the model is instructed to emit when the request cannot be
/// answered from the given schema. Returned to clients verbatim, as a normal
/// successful payload.
pub const UNANSWERABLE: &str = "Error: Request cannot be answered with the current schema.";

/// Renders the instruction template around the schema text and the raw user
/// request. Neither side is escaped.
pub fn build_prompt(schema_text: &str, request: &str) -> String {
    format!(
        r#"You are a SQL generator. Follow these rules strictly:
1. ONLY use the schema provided below.
2. If the user request cannot be answered with the schema, reply ONLY with:
   "{UNANSWERABLE}"
3. Do NOT suggest new tables, columns, or schemas.
4. Output ONLY the SQL query (or the error message).

Schema:
{schema_text}

User request: "{request}"

SQL:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{render_schema, TableDef};

    #[test]
    fn test_prompt_contains_schema_line_and_request() {
        let schema = vec![TableDef::new("users", &["id", "name"])];
        let prompt = build_prompt(&render_schema(&schema), "list all users");
        assert!(prompt.contains("users(id, name)"));
        assert!(prompt.contains("list all users"));
    }

    #[test]
    fn test_prompt_carries_sentinel_literal() {
        let prompt = build_prompt("", "anything");
        assert!(prompt.contains(UNANSWERABLE));
    }

    #[test]
    fn test_empty_schema_section_is_empty() {
        let prompt = build_prompt(&render_schema(&[]), "whatever");
        assert!(prompt.contains("Schema:\n\n"));
    }

    #[test]
    fn test_no_escaping_of_request() {
        let prompt = build_prompt("", r#"a "quoted" request"#);
        assert!(prompt.contains(r#"User request: "a "quoted" request""#));
    }
}
