/// Integration tests for code generation

use widget_compiler::{CompileOptions, StyleMapping, WidgetCompiler, WidgetRequest};

const CENTERED: &str = "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%);";

/// Helper to generate a widget script without saving it
fn generate(request: &WidgetRequest) -> Result<String, String> {
    let compiler = WidgetCompiler::new(CompileOptions::new());
    compiler
        .generate(request)
        .map(|artifact| artifact.into_string())
        .map_err(|e| e.to_string())
}

fn request_with_styles(styles: &str) -> WidgetRequest {
    WidgetRequest::new("whoami", 1000, CENTERED, "<div>{data}</div>", styles)
}

/// Pull the command literal back out of a generated script.
fn command_literal(js: &str) -> String {
    let line = js
        .lines()
        .find(|line| line.starts_with("export const command = "))
        .expect("no command export");
    let literal = line.trim_start_matches("export const command = ");
    serde_json::from_str(literal).expect("command literal is not a valid string literal")
}

#[test]
fn test_basic_widget() {
    let js = generate(&request_with_styles("{}")).expect("generation failed");
    assert!(js.starts_with("import { css } from 'uebersicht';"));
    assert!(js.contains("export const command = \"whoami\""));
    assert!(js.contains("export const refreshFrequency = 1000\n"));
    assert!(js.contains("export const render = ({ data_in }) => (\n    <div>{data}</div>\n);"));
    assert!(js.contains(&format!("export const className = css`\n{}\n`;", CENTERED)));
    assert!(js.ends_with("// No CSS classes defined"));
}

#[test]
fn test_generation_is_deterministic() {
    let request = request_with_styles(
        r#"{"titleStyle": "font-weight: bold;", "bodyStyle": "color: white;", "footStyle": "opacity: 0.5;"}"#,
    );
    let first = generate(&request).unwrap();
    for _ in 0..10 {
        assert_eq!(generate(&request).unwrap(), first);
    }
}

#[test]
fn test_single_style_variable() {
    let js = generate(&request_with_styles(r#"{"titleStyle": "font-weight: bold;"}"#)).unwrap();
    assert!(js.ends_with("const titleStyle = css`font-weight: bold;`;"));
    assert_eq!(js.matches("const ").count(), 1 + 4);
    assert!(!js.contains("// No CSS classes defined"));
}

#[test]
fn test_malformed_styles_still_generate() {
    for styles in ["", "{", "[]", r#"{"titleStyle": 3}"#, "titleStyle: bold"] {
        let js = generate(&request_with_styles(styles)).expect("generation failed");
        assert!(js.ends_with("// No CSS classes defined"), "styles {:?}", styles);
    }
}

#[test]
fn test_command_with_quotes_is_escaped() {
    let mut request = request_with_styles("{}");
    request.command = r#"say "hi""#.to_string();

    let js = generate(&request).unwrap();
    assert!(js.contains(r#"export const command = "say \"hi\"""#));
    assert_eq!(command_literal(&js), r#"say "hi""#);
}

#[test]
fn test_command_with_backslashes_round_trips() {
    let mut request = request_with_styles("{}");
    request.command = r#"printf '%s\n' "$(date)" | sed 's/\\/x/'"#.to_string();

    let js = generate(&request).unwrap();
    assert_eq!(command_literal(&js), request.command);
}

#[test]
fn test_markup_and_positioning_inlined_verbatim() {
    let markup = "<div className={boxStyle}>\n  <h1>{data}</h1>\n</div>";
    let positioning = "position: absolute; bottom: 20px; right: 20px;";
    let request = WidgetRequest::new("uptime", 60000, positioning, markup, r#"{"boxStyle": "padding: 4px;"}"#);

    let js = generate(&request).unwrap();
    assert!(js.contains(markup));
    assert!(js.contains(positioning));
    assert!(js.contains("export const refreshFrequency = 60000"));
}

#[test]
fn test_validation_stops_generation() {
    let request = WidgetRequest::new("", -1, "", "", "{}");
    assert_eq!(generate(&request).unwrap_err(), "Bash command cannot be empty");

    let request = WidgetRequest::new("date", -1, "", "", "{}");
    assert_eq!(generate(&request).unwrap_err(), "Refresh frequency must be greater than 0");

    let request = WidgetRequest::new("date", 1, "", "", "{}");
    assert_eq!(generate(&request).unwrap_err(), "Markup content cannot be empty");

    let request = WidgetRequest::new("date", 1, "", "<div/>", "{}");
    assert_eq!(generate(&request).unwrap_err(), "CSS positioning cannot be empty");
}

#[test]
fn test_parsed_mapping_matches_declarations() {
    let raw = r#"{"aStyle": "color: red;", "bStyle": "color: blue;"}"#;
    let js = generate(&request_with_styles(raw)).unwrap();
    for (name, body) in StyleMapping::parse(raw).iter() {
        assert!(js.contains(&format!("const {} = css`{}`;", name, body)));
    }
}
