//! Declaration loading and render state tests using tempfile

use cloudinit_config::config::{load_configuration, validate};
use cloudinit_config::{ConfigError, check_renderable, render};
use cloudinit_config::state::{Change, RenderState, load_state, plan, save_state};
use std::fs;
use tempfile::TempDir;

const DECLARATION: &str = r#"gzip: false
base64_encode: false
part:
  - content_type: text/x-shellscript
    content: baz
    filename: foobar.sh
"#;

/// A bad boundary passes loading and option validation but not the pre-render check
#[tokio::test]
async fn test_declaration_bad_boundary_not_renderable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("userdata.yaml");
    fs::write(&path, format!("boundary: \"a;b\"\n{}", DECLARATION)).unwrap();

    let config = load_configuration(&path).await.unwrap();
    validate(&config).unwrap();
    assert!(matches!(
        check_renderable(&config),
        Err(ConfigError::Boundary { .. })
    ));
}

/// A YAML declaration renders to the expected document
#[tokio::test]
async fn test_render_from_yaml_declaration() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("userdata.yaml");
    fs::write(&path, DECLARATION).unwrap();

    let config = load_configuration(&path).await.unwrap();
    validate(&config).unwrap();

    let doc = render(&config).unwrap();
    assert!(doc.content.starts_with("Content-Type: multipart/mixed; boundary=\"MIMEBOUNDARY\"\n"));
    assert!(doc.content.contains("Content-Disposition: attachment; filename=\"foobar.sh\"\r\n"));
}

/// Declarations must carry at least one part
#[tokio::test]
async fn test_declaration_without_parts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.json");
    fs::write(&path, r#"{"gzip": true}"#).unwrap();

    assert!(load_configuration(&path).await.is_err());
}

/// Validation catches gzip without base64 in a declaration
#[tokio::test]
async fn test_declaration_gzip_without_base64() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.yaml");
    fs::write(&path, "base64_encode: false\npart:\n  - content: x\n").unwrap();

    let config = load_configuration(&path).await.unwrap();
    assert!(validate(&config).is_err());
}

/// Re-rendering unchanged input is a no-op; editing a part replaces
#[tokio::test]
async fn test_state_change_detection() {
    let temp_dir = TempDir::new().unwrap();
    let decl = temp_dir.path().join("userdata.yaml");
    let state_path = temp_dir.path().join("render-state.json");
    fs::write(&decl, DECLARATION).unwrap();

    let config = load_configuration(&decl).await.unwrap();
    let first = RenderState::new(&config, &render(&config).unwrap());
    assert_eq!(plan(load_state(&state_path).await.unwrap().as_ref(), &first), Change::Create);
    save_state(&state_path, &first).await.unwrap();

    let config = load_configuration(&decl).await.unwrap();
    let again = RenderState::new(&config, &render(&config).unwrap());
    assert_eq!(plan(load_state(&state_path).await.unwrap().as_ref(), &again), Change::NoOp);

    fs::write(&decl, DECLARATION.replace("baz", "qux")).unwrap();
    let config = load_configuration(&decl).await.unwrap();
    let edited = RenderState::new(&config, &render(&config).unwrap());
    assert_ne!(edited.id, first.id);
    assert_eq!(plan(load_state(&state_path).await.unwrap().as_ref(), &edited), Change::Replace);
}

/// Saved state is readable JSON with the expected fields
#[tokio::test]
async fn test_state_file_format() {
    let temp_dir = TempDir::new().unwrap();
    let decl = temp_dir.path().join("userdata.yaml");
    let state_path = temp_dir.path().join("render-state.json");
    fs::write(&decl, DECLARATION).unwrap();

    let config = load_configuration(&decl).await.unwrap();
    let state = RenderState::new(&config, &render(&config).unwrap());
    save_state(&state_path, &state).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state_path).unwrap()).unwrap();
    assert_eq!(json["id"], state.id.as_str());
    assert_eq!(json["gzip"], false);
    assert_eq!(json["base64_encode"], false);
    assert_eq!(json["boundary"], "MIMEBOUNDARY");
}
