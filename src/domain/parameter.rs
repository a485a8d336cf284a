//! Leaf values of a module tree.

use std::fmt;

/// Capability a leaf value may expose to be marked trainable.
///
/// The default does nothing, so any `Debug` type can be made a leaf value
/// with an empty impl.
pub trait ParamValue: fmt::Debug {
    fn mark_trainable(&mut self, _trainable: bool) {}
}

macro_rules! plain_param_value {
    ($($t:ty),* $(,)?) => {
        $(impl ParamValue for $t {})*
    };
}

plain_param_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    toml::Value,
);

impl<T: ParamValue> ParamValue for Option<T> {
    fn mark_trainable(&mut self, trainable: bool) {
        if let Some(v) = self {
            v.mark_trainable(trainable);
        }
    }
}

impl<T: ParamValue> ParamValue for Vec<T> {
    fn mark_trainable(&mut self, trainable: bool) {
        for v in self.iter_mut() {
            v.mark_trainable(trainable);
        }
    }
}

impl<T: ParamValue + ?Sized> ParamValue for Box<T> {
    fn mark_trainable(&mut self, trainable: bool) {
        (**self).mark_trainable(trainable);
    }
}

/// A named leaf stored in a module: wraps exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter<V> {
    value: V,
    trainable: bool,
}

impl<V: ParamValue> Parameter<V> {
    /// Trainable parameter.
    pub fn new(value: V) -> Self {
        Self::with_trainable(value, true)
    }

    /// Parameter excluded from training.
    pub fn frozen(value: V) -> Self {
        Self::with_trainable(value, false)
    }

    pub fn with_trainable(mut value: V, trainable: bool) -> Self {
        value.mark_trainable(trainable);
        Self { value, trainable }
    }

    /// Replace the wrapped value and re-apply the trainable marking.
    pub fn update(&mut self, mut value: V) {
        value.mark_trainable(self.trainable);
        self.value = value;
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn is_trainable(&self) -> bool {
        self.trainable
    }
}

impl<V: ParamValue> fmt::Display for Parameter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Tracked {
        marks: Vec<bool>,
    }

    impl ParamValue for Tracked {
        fn mark_trainable(&mut self, trainable: bool) {
            self.marks.push(trainable);
        }
    }

    #[test]
    fn test_new_marks_value_trainable() {
        let p = Parameter::new(Tracked::default());
        assert!(p.is_trainable());
        assert_eq!(p.value().marks, vec![true]);
    }

    #[test]
    fn test_frozen_marks_value_not_trainable() {
        let p = Parameter::frozen(Tracked::default());
        assert!(!p.is_trainable());
        assert_eq!(p.value().marks, vec![false]);
    }

    #[test]
    fn test_update_replaces_value_and_reapplies_marking() {
        let mut p = Parameter::new(Tracked::default());
        p.update(Tracked { marks: vec![] });
        assert_eq!(p.value().marks, vec![true]);
    }

    #[test]
    fn test_option_forwards_marking_only_when_present() {
        let p = Parameter::frozen(Some(Tracked::default()));
        assert_eq!(p.value().as_ref().unwrap().marks, vec![false]);

        let none: Parameter<Option<Tracked>> = Parameter::new(None);
        assert_eq!(none.value(), &None);
    }

    #[test]
    fn test_values_without_capability_are_accepted() {
        let mut p = Parameter::new(40_i64);
        p.update(41);
        assert_eq!(*p.value(), 41);
        assert_eq!(p.to_string(), "41");
    }
}
