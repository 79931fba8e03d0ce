#[cfg(test)]
mod tests {
    use crate::error::ERR_SYNTAX;
    use crate::parse::{parse_module, SourceDialect};
    use oxc_allocator::Allocator;

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(SourceDialect::from_path("src/App.js"), SourceDialect::Js);
        assert_eq!(SourceDialect::from_path("src/App.mjs"), SourceDialect::Js);
        assert_eq!(SourceDialect::from_path("src/App.jsx"), SourceDialect::Jsx);
        assert_eq!(SourceDialect::from_path("src/App.ts"), SourceDialect::Ts);
        assert_eq!(SourceDialect::from_path("src/App.TSX"), SourceDialect::Tsx);
        assert_eq!(SourceDialect::from_path("src/App.njs"), SourceDialect::Tsx);
        assert_eq!(SourceDialect::from_path(""), SourceDialect::Tsx);
    }

    #[test]
    fn test_dialect_deserializes_lowercase() {
        let dialect: SourceDialect = serde_json::from_str("\"jsx\"").unwrap();
        assert_eq!(dialect, SourceDialect::Jsx);
    }

    #[test]
    fn test_parse_class_with_types_and_markup() {
        let code = r#"
            import Nullstack from 'nullstack';
            class Home extends Nullstack {
                count: number = 0;
                renderCounter({ step }: { step: number }) {
                    return <button onclick={() => this.count += step}>{this.count}</button>;
                }
                render() {
                    return <main><Counter step={1} /></main>;
                }
            }
            export default Home;
        "#;
        let allocator = Allocator::default();
        let parsed = parse_module(&allocator, code, SourceDialect::Tsx, "Home.tsx").unwrap();
        assert_eq!(parsed.program.body.len(), 3);
    }

    #[test]
    fn test_plain_typescript_rejects_markup() {
        let code = "class A { render() { return <div />; } }";
        let allocator = Allocator::default();
        assert!(parse_module(&allocator, code, SourceDialect::Ts, "a.ts").is_err());
        assert!(parse_module(&allocator, code, SourceDialect::Js, "a.js").is_ok());
    }

    #[test]
    fn test_syntax_error_reports_file_and_location() {
        let code = "class A {\n  render() {\n    return <div>;\n  }\n}\n";
        let allocator = Allocator::default();
        let err = match parse_module(&allocator, code, SourceDialect::Jsx, "src/A.jsx") {
            Ok(_) => panic!("expected a syntax error"),
            Err(err) => err,
        };
        assert_eq!(err.code, ERR_SYNTAX);
        assert_eq!(err.file, "src/A.jsx");
        assert!(err.line >= 3, "error reported on line {}", err.line);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_redeclaration_is_rejected() {
        let code = "let Card = 1;\nlet Card = 2;\n";
        let allocator = Allocator::default();
        let err = match parse_module(&allocator, code, SourceDialect::Jsx, "dup.jsx") {
            Ok(_) => panic!("a redeclared binding must not parse cleanly"),
            Err(err) => err,
        };
        assert!(err.is_syntax_error());
        assert_eq!(err.file, "dup.jsx");
    }
}
