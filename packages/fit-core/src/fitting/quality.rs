use crate::constants::{INITIAL_QUALITY, MAX_QUALITY, MIN_QUALITY};

/// エンコード品質（1-100 のパーセント）
///
/// 各エンコーダはこれを自分のスケール（0-100 の整数、0.0-1.0 の小数など）に
/// 換算して使う。値は常に [MIN_QUALITY, MAX_QUALITY] に収まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: Quality = Quality(MIN_QUALITY);
    pub const MAX: Quality = Quality(MAX_QUALITY);
    pub const INITIAL: Quality = Quality(INITIAL_QUALITY);

    pub fn new(percent: u8) -> Self {
        Quality(percent.clamp(MIN_QUALITY, MAX_QUALITY))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// 0.0-1.0 スケール
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    pub fn lower(self, step: u8) -> Self {
        Quality::new(self.0.saturating_sub(step))
    }

    pub fn raise(self, step: u8) -> Self {
        Quality::new(self.0.saturating_add(step))
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::INITIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(Quality::new(0).percent(), 1);
        assert_eq!(Quality::new(50).percent(), 50);
        assert_eq!(Quality::new(250).percent(), 100);
    }

    #[test]
    fn test_steps_stay_in_range() {
        assert_eq!(Quality::new(3).lower(5), Quality::MIN);
        assert_eq!(Quality::new(99).raise(3), Quality::MAX);
        assert_eq!(Quality::new(255).raise(255), Quality::MAX);
        assert_eq!(Quality::INITIAL.lower(5).percent(), 87);
        assert_eq!(Quality::INITIAL.raise(3).percent(), 95);
    }

    #[test]
    fn test_fraction() {
        assert_eq!(Quality::MAX.fraction(), 1.0);
        assert!((Quality::INITIAL.fraction() - 0.92).abs() < f32::EPSILON);
    }
}
