//! ルール導出: プリセット名または自由記述から Spec を作る

pub mod preset;
pub mod spec;
pub mod text;

pub use preset::{find_preset, presets, Preset};
pub use spec::{SizeWindow, Spec};
pub use text::parse_rule_text;

use crate::errors::RuleError;

/// Spec の導出元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource<'a> {
    Preset(&'a str),
    FreeText(&'a str),
    Default,
}

impl<'a> RuleSource<'a> {
    /// リクエストの preset / rule 欄から導出元を決める
    ///
    /// 空白以外を含む preset が最優先、次に空でない rule、どちらも無ければ既定値。
    /// preset 名は加工せずに渡すので、前後の空白も含めて完全一致で照合される。
    pub fn from_request(preset: Option<&'a str>, rule: Option<&'a str>) -> Self {
        let preset = preset.filter(|id| !id.trim().is_empty());
        let rule = rule.map(str::trim).filter(|text| !text.is_empty());

        match (preset, rule) {
            (Some(id), _) => RuleSource::Preset(id),
            (None, Some(text)) => RuleSource::FreeText(text),
            (None, None) => RuleSource::Default,
        }
    }
}

/// 導出元に応じて Spec を作る
pub fn derive_spec(source: RuleSource<'_>) -> Result<Spec, RuleError> {
    match source {
        RuleSource::Preset(id) => find_preset(id),
        RuleSource::FreeText(text) => parse_rule_text(text),
        RuleSource::Default => Ok(Spec::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_priority() {
        assert_eq!(
            RuleSource::from_request(Some("signature"), Some("100x100")),
            RuleSource::Preset("signature")
        );
        assert_eq!(
            RuleSource::from_request(Some("  "), Some("100x100")),
            RuleSource::FreeText("100x100")
        );
        assert_eq!(
            RuleSource::from_request(None, Some("\n")),
            RuleSource::Default
        );
        assert_eq!(RuleSource::from_request(None, None), RuleSource::Default);
    }

    #[test]
    fn test_preset_id_is_not_trimmed() {
        let source = RuleSource::from_request(Some(" photo"), None);
        assert_eq!(source, RuleSource::Preset(" photo"));
        assert!(matches!(
            derive_spec(source),
            Err(RuleError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_derive_spec() {
        let spec = derive_spec(RuleSource::Preset("signature")).unwrap();
        assert_eq!((spec.width(), spec.height()), (140, 60));

        let spec = derive_spec(RuleSource::FreeText("320x240 png")).unwrap();
        assert_eq!((spec.width(), spec.height()), (320, 240));

        assert_eq!(derive_spec(RuleSource::Default).unwrap(), Spec::default());

        assert!(matches!(
            derive_spec(RuleSource::Preset("nope")),
            Err(RuleError::UnknownPreset(_))
        ));
    }
}
