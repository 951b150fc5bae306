//! Subcommand implementations.

use crate::cli::{Cli, Command};
use crate::{AppError, AppResult};
use designdraw_core::storage::{AutoSaveManager, Storage, create_autosave_manager};
use designdraw_core::{Document, EngineConfig, InteractionController};
use designdraw_render::{FontArc, export_png};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

fn read_file(path: &Path) -> AppResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> AppResult<()> {
    std::fs::write(path, contents).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_font(path: &Path) -> AppResult<FontArc> {
    let bytes = read_file(path)?;
    FontArc::try_from_vec(bytes).map_err(|e| AppError::Font(path.to_path_buf(), e))
}

/// Summary of a document: object counts per kind, content bounds and the
/// canvas extent the engine would give it.
pub fn describe(json: &str, config: EngineConfig) -> AppResult<String> {
    let mut controller = InteractionController::with_config(config);
    controller.load_document(json)?;
    let scene = controller.scene();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for shape in scene.iter() {
        *counts.entry(shape.kind_name()).or_default() += 1;
    }

    let mut out = String::new();
    let _ = writeln!(out, "objects: {}", scene.len());
    for (kind, count) in &counts {
        let _ = writeln!(out, "  {kind}: {count}");
    }
    match scene.bounds() {
        Some(b) => {
            let _ = writeln!(out, "bounds: {},{} .. {},{}", b.x0, b.y0, b.x1, b.y1);
        }
        None => out.push_str("bounds: empty\n"),
    }
    let extent = controller.extent();
    let _ = write!(out, "extent: {}x{}", extent.width, extent.height);
    Ok(out)
}

/// Render a document to PNG bytes.
pub fn export_document(json: &str, font: Option<FontArc>) -> AppResult<Vec<u8>> {
    let scene = Document::from_json(json)?.into_scene();
    Ok(export_png(&scene, font)?)
}

/// Save `document` under `id` and as the latest autosave.
pub fn autosave_document<S: Storage>(
    manager: &mut AutoSaveManager<S>,
    id: &str,
    document: &Document,
) -> AppResult<()> {
    manager.set_document_id(Some(id.to_string()));
    manager.mark_dirty();
    pollster::block_on(manager.save(document))?;
    Ok(())
}

/// The most recent autosave.
pub fn restore_last<S: Storage>(manager: &mut AutoSaveManager<S>) -> AppResult<Document> {
    pollster::block_on(manager.load_last()).ok_or(AppError::NothingToRestore)
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Info { file } => {
            let json = read_text(&file)?;
            println!("{}", describe(&json, config)?);
        }
        Command::Export { file, output, font } => {
            let json = read_text(&file)?;
            let font = font.as_deref().map(load_font).transpose()?;
            if font.is_none() {
                log::warn!("no --font given, text objects will not be drawn");
            }
            let png = export_document(&json, font)?;
            write_file(&output, &png)?;
            log::info!("wrote {} ({} bytes)", output.display(), png.len());
        }
        Command::New { file } => {
            let json = InteractionController::with_config(config).serialize_document()?;
            write_file(&file, json)?;
            log::info!("created {}", file.display());
        }
        Command::Autosave { file } => {
            let document = Document::from_json(&read_text(&file)?)?;
            let id = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| designdraw_core::storage::DEFAULT_DOCUMENT_ID.to_string());
            let mut manager = create_autosave_manager(config.autosave_interval_secs)?;
            autosave_document(&mut manager, &id, &document)?;
            println!("saved {id} to {}", manager.storage().base_path().display());
        }
        Command::Restore { output } => {
            let mut manager = create_autosave_manager(config.autosave_interval_secs)?;
            let document = restore_last(&mut manager)?;
            write_file(&output, document.to_json()?)?;
            println!("restored {} objects to {}", document.objects.len(), output.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use designdraw_core::storage::MemoryStorage;
    use std::sync::Arc;

    const DRAWING: &str = r#"{"version":"1.0","objects":[
        {"type":"rectangle","x":10,"y":20,"width":100,"height":50},
        {"type":"rectangle","x":0,"y":0,"width":5,"height":5},
        {"type":"text","x":1400,"y":10,"text":"far"}
    ]}"#;

    #[test]
    fn test_describe_counts_and_extent() {
        let report = describe(DRAWING, EngineConfig::default()).unwrap();
        assert!(report.starts_with("objects: 3\n"));
        assert!(report.contains("  rectangle: 2\n"));
        assert!(report.contains("  text: 1\n"));
        assert!(report.contains("bounds: 0,0 .. "));
        assert!(report.ends_with("extent: 2000x800"));
    }

    #[test]
    fn test_describe_empty_and_malformed() {
        let report = describe(r#"{"objects":[]}"#, EngineConfig::default()).unwrap();
        assert_eq!(report, "objects: 0\nbounds: empty\nextent: 1200x800");
        assert!(matches!(
            describe("not json", EngineConfig::default()),
            Err(AppError::Document(_))
        ));
    }

    #[test]
    fn test_export_document_png() {
        let png = export_document(DRAWING, None).unwrap();
        assert_eq!(&png[..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_new_writes_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        run(Cli {
            config: None,
            command: Command::New { file: path.clone() },
        })
        .unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(Document::from_json(&json).unwrap().objects.is_empty());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("drawing.json");
        let output = dir.path().join("drawing.png");
        std::fs::write(&input, DRAWING).unwrap();
        run(Cli {
            config: None,
            command: Command::Export {
                file: input,
                output: output.clone(),
                font: None,
            },
        })
        .unwrap();
        assert!(std::fs::metadata(&output).unwrap().len() > 8);
    }

    #[test]
    fn test_missing_input_reports_path() {
        let err = run(Cli {
            config: None,
            command: Command::Info {
                file: "/nonexistent/drawing.json".into(),
            },
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/drawing.json"));
    }

    #[test]
    fn test_bad_font_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("broken.ttf");
        std::fs::write(&font, b"not a font").unwrap();
        assert!(matches!(load_font(&font), Err(AppError::Font(_, _))));
    }

    #[test]
    fn test_autosave_then_restore() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(matches!(restore_last(&mut manager), Err(AppError::NothingToRestore)));

        let document = Document::from_json(DRAWING).unwrap();
        autosave_document(&mut manager, "drawing", &document).unwrap();
        assert!(!manager.is_dirty());
        assert_eq!(restore_last(&mut manager).unwrap(), document);
        assert!(pollster::block_on(manager.exists("drawing")).unwrap());
    }
}
