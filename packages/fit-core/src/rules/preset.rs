use serde::Serialize;

use crate::errors::RuleError;
use crate::rules::spec::Spec;
use crate::transform::OutputFormat;

/// 名前付きの固定 Spec
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub spec: Spec,
}

/// 書類写真向けのプリセット表（起動時から不変）
static PRESETS: [Preset; 4] = [
    Preset {
        id: "photo",
        spec: Spec::from_parts(200, 230, 20.0, 50.0, OutputFormat::Jpeg),
    },
    Preset {
        id: "signature",
        spec: Spec::from_parts(140, 60, 10.0, 20.0, OutputFormat::Jpeg),
    },
    Preset {
        id: "thumb",
        spec: Spec::from_parts(240, 240, 20.0, 50.0, OutputFormat::Jpeg),
    },
    Preset {
        id: "declaration",
        spec: Spec::from_parts(800, 400, 50.0, 100.0, OutputFormat::Jpeg),
    },
];

/// プリセット一覧
pub fn presets() -> &'static [Preset] {
    &PRESETS
}

/// プリセット名（完全一致）から Spec を引く
pub fn find_preset(id: &str) -> Result<Spec, RuleError> {
    PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .map(|preset| preset.spec)
        .ok_or_else(|| RuleError::UnknownPreset(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_spec(id: &str, width: u32, height: u32, min_kb: f64, max_kb: f64) {
        let spec = find_preset(id).unwrap();
        assert_eq!(spec.width(), width, "{id} width");
        assert_eq!(spec.height(), height, "{id} height");
        assert_eq!(spec.min_kb(), min_kb, "{id} min_kb");
        assert_eq!(spec.max_kb(), max_kb, "{id} max_kb");
        assert_eq!(spec.format(), OutputFormat::Jpeg, "{id} format");
    }

    #[test]
    fn test_preset_values() {
        assert_spec("photo", 200, 230, 20.0, 50.0);
        assert_spec("signature", 140, 60, 10.0, 20.0);
        assert_spec("thumb", 240, 240, 20.0, 50.0);
        assert_spec("declaration", 800, 400, 50.0, 100.0);
    }

    #[test]
    fn test_presets_pass_validation() {
        for preset in presets() {
            let spec = preset.spec;
            let validated = Spec::new(
                spec.width(),
                spec.height(),
                spec.min_kb(),
                spec.max_kb(),
                spec.format(),
            );
            assert!(validated.is_ok(), "preset {} is invalid", preset.id);
        }
    }

    #[test]
    fn test_unknown_preset() {
        match find_preset("passport") {
            Err(RuleError::UnknownPreset(id)) => assert_eq!(id, "passport"),
            other => panic!("expected UnknownPreset, got {other:?}"),
        }
    }

    #[test]
    fn test_preset_lookup_is_exact() {
        assert!(find_preset("Photo").is_err());
        assert!(find_preset(" photo").is_err());
        assert!(find_preset("").is_err());
    }
}
