use fts_lib::figma::api_types::FigmaVariablesResponse;
use fts_lib::figma::node_from_value;
use fts_lib::pipeline::{run_sync, CatalogSelection, DesignSource, SyncRequest};
use fts_lib::tokens::resolver::resolve_alias_chain;
use fts_lib::tokens::{apply_tokens, resolve_variables, walk_document, FontUsage};
use fts_lib::{Config, ExtractOptions, FtsError, TokenKind, TokenSet};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn mobile_text_becomes_rem_font_size() {
    let root = node_from_value(&json!({
        "id": "1:1", "name": "Page", "type": "FRAME",
        "children": [{
            "id": "1:2", "name": "Mobile/Body", "type": "TEXT",
            "style": { "fontFamily": "Inter", "fontWeight": 400, "fontSize": 14 }
        }]
    }))
    .expect("node");

    let out = walk_document(Some(&root), &ExtractOptions::default());
    assert_eq!(
        out.tokens.get(TokenKind::FontSize, "mobile-body"),
        Some("#{rem(14px)}")
    );
    assert_eq!(out.tokens.get(TokenKind::FontSize, "body"), Some("#{rem(14px)}"));
    assert!(out.fonts.contains(&FontUsage {
        family: "Inter".into(),
        weight: 400,
        italic: false,
    }));
}

#[test]
fn parent_opacity_composes_into_fill_alpha() {
    let root = node_from_value(&json!({
        "id": "1:1", "name": "Page", "type": "FRAME",
        "children": [{
            "id": "1:2", "name": "Palette", "type": "GROUP", "opacity": 0.5,
            "children": [{
                "id": "1:3", "name": "Swatch Red", "type": "RECTANGLE",
                "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } }]
            }]
        }]
    }))
    .expect("node");

    let out = walk_document(Some(&root), &ExtractOptions::default());
    assert_eq!(
        out.tokens.get(TokenKind::Color, "swatch-red"),
        Some("rgba(255, 0, 0, 0.5)")
    );
}

#[test]
fn matcher_changes_only_the_matched_value() {
    let mut tokens = TokenSet::default();
    tokens.insert(TokenKind::Color, &["greyscale-900".to_string()], "#1a1a1a");
    let text = "/* palette */\n:root {\n  --greyscale--900: #000000;\n  --brand: red;\n}\n";

    let update = apply_tokens(text, &tokens, 8);
    assert_eq!(update.changed_count(), 1);
    assert_eq!(
        update.text,
        "/* palette */\n:root {\n  --greyscale--900: #1a1a1a;\n  --brand: red;\n}\n"
    );

    let again = apply_tokens(&update.text, &tokens, 8);
    assert_eq!(again.changed_count(), 0);
    assert_eq!(again.text, update.text);
}

#[test]
fn two_step_alias_chain_resolves_to_literal() {
    let response: FigmaVariablesResponse = serde_json::from_value(json!({ "meta": {
        "variables": {
            "A": { "id": "A", "name": "Brand/Primary", "variableCollectionId": "C",
                   "resolvedType": "COLOR",
                   "valuesByMode": { "m": { "type": "VARIABLE_ALIAS", "id": "B" } } },
            "B": { "id": "B", "name": "Accent", "variableCollectionId": "C",
                   "resolvedType": "COLOR",
                   "valuesByMode": { "m": { "type": "VARIABLE_ALIAS", "id": "L" } } },
            "L": { "id": "L", "name": "Blue/500", "variableCollectionId": "C",
                   "resolvedType": "COLOR",
                   "valuesByMode": { "m": { "r": 0, "g": 0, "b": 1, "a": 1 } } }
        },
        "variableCollections": {
            "C": { "id": "C", "name": "Colors", "defaultModeId": "m",
                   "modes": [{ "modeId": "m", "name": "Light" }] }
        }
    } }))
    .expect("variables response");
    let meta = response.meta;

    assert!(resolve_alias_chain(&meta, &meta.variables["A"], 50)
        .into_value()
        .is_some());
    let tokens = resolve_variables(&meta, &ExtractOptions::default());
    assert_eq!(tokens.get(TokenKind::Color, "brand-primary"), Some("#0000ff"));
    assert_eq!(tokens.get(TokenKind::Color, "blue-500"), Some("#0000ff"));
}

#[tokio::test]
async fn sync_from_saved_documents_updates_stylesheet() {
    let dir = TempDir::new().expect("tempdir");
    let document = dir.path().join("frame.json");
    let variables = dir.path().join("variables.json");
    let stylesheet = dir.path().join("_variables.scss");
    std::fs::write(
        &document,
        json!({ "document": {
            "id": "1:2", "name": "Tokens", "type": "FRAME",
            "children": [
                { "id": "2:1", "name": "Greyscale/900", "type": "RECTANGLE",
                  "fills": [{ "type": "SOLID", "color": { "r": 0.1, "g": 0.1, "b": 0.1, "a": 1 } }] }
            ]
        } })
        .to_string(),
    )
    .expect("write document");
    std::fs::write(
        &variables,
        json!({ "meta": {
            "variables": {
                "V1": { "id": "V1", "name": "Greyscale/900", "variableCollectionId": "C",
                        "resolvedType": "COLOR",
                        "valuesByMode": { "m": { "r": 1, "g": 1, "b": 1, "a": 1 } } },
                "V2": { "id": "V2", "name": "Brand/Primary", "variableCollectionId": "C",
                        "resolvedType": "COLOR",
                        "valuesByMode": { "m": { "r": 0, "g": 0, "b": 1, "a": 1 } } }
            },
            "variableCollections": {
                "C": { "id": "C", "name": "Colors", "defaultModeId": "m",
                       "modes": [{ "modeId": "m", "name": "Light" }] }
            }
        } })
        .to_string(),
    )
    .expect("write variables");
    let original = ":root {\n  --greyscale--900: #000000;\n  --brand--primary: #ff0000;\n}\n";
    std::fs::write(&stylesheet, original).expect("write stylesheet");

    let request = SyncRequest {
        source: DesignSource::Local {
            document: document.clone(),
            variables: Some(variables),
            node_id: None,
        },
        catalogs: CatalogSelection::default(),
        stylesheet: stylesheet.clone(),
        dry_run: false,
        backup: true,
    };
    let report = run_sync(&request, &Config::default()).await.expect("sync");

    assert_eq!(report.update.changed_count(), 2);
    assert_eq!(
        std::fs::read_to_string(&stylesheet).unwrap(),
        ":root {\n  --greyscale--900: #1a1a1a;\n  --brand--primary: #0000ff;\n}\n"
    );
    let backup = report.backup_path.expect("backup");
    assert_eq!(backup, dir.path().join("_variables.scss.bak"));
    assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
}

#[tokio::test]
async fn missing_document_leaves_stylesheet_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let stylesheet = dir.path().join("tokens.css");
    std::fs::write(&stylesheet, "--a: 1px;\n").expect("write stylesheet");

    let request = SyncRequest {
        source: DesignSource::Local {
            document: dir.path().join("missing.json"),
            variables: None,
            node_id: None,
        },
        catalogs: CatalogSelection::default(),
        stylesheet: stylesheet.clone(),
        dry_run: false,
        backup: true,
    };
    let err = run_sync(&request, &Config::default()).await.unwrap_err();
    assert!(matches!(err, FtsError::Io(_)));
    assert_eq!(std::fs::read_to_string(&stylesheet).unwrap(), "--a: 1px;\n");
    assert!(!dir.path().join("tokens.css.bak").exists());
}
