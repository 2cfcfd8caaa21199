//! Named text elements and the score/best bindings onto them.
use std::cell::RefCell;
use std::rc::Rc;

pub const SCORE_TEXT: &str = "ScoreText";
pub const BEST_SCORE_TEXT: &str = "BestScoreText";

/// A text element owned by a scene. Clones refer to the same text, so a
/// bound sink and the renderer see the same content.
#[derive(Clone, Debug)]
pub struct TextLabel {
    name: Rc<str>,
    text: Rc<RefCell<String>>,
}

impl TextLabel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            text: Rc::new(RefCell::new(String::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    /// True when both handles point at the same element.
    pub fn same_element(&self, other: &TextLabel) -> bool {
        Rc::ptr_eq(&self.text, &other.text)
    }
}

/// Score and best-score sinks. Either may be unbound.
#[derive(Clone, Debug, Default)]
pub struct DisplayBinding {
    score: Option<TextLabel>,
    best: Option<TextLabel>,
}

impl DisplayBinding {
    /// Resolve both sinks among `labels` by exact name. First match wins.
    pub fn resolve<'a>(labels: impl IntoIterator<Item = &'a TextLabel>) -> Self {
        let mut binding = Self::default();
        for label in labels {
            if binding.score.is_none() && label.name() == SCORE_TEXT {
                binding.score = Some(label.clone());
            }
            if binding.best.is_none() && label.name() == BEST_SCORE_TEXT {
                binding.best = Some(label.clone());
            }
        }
        binding
    }

    pub fn is_complete(&self) -> bool {
        self.score.is_some() && self.best.is_some()
    }

    /// Returns false when the score sink is unbound.
    pub fn show_score(&self, score: u32) -> bool {
        match &self.score {
            Some(label) => {
                label.set_text(format!("Score: {score}"));
                true
            }
            None => false,
        }
    }

    /// Returns false when the best-score sink is unbound.
    pub fn show_best(&self, best: u32) -> bool {
        match &self.best {
            Some(label) => {
                label.set_text(format!("Best Score: {best}"));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_binds_distinct_labels() {
        let labels = vec![
            TextLabel::new("Title"),
            TextLabel::new(BEST_SCORE_TEXT),
            TextLabel::new(SCORE_TEXT),
        ];
        let binding = DisplayBinding::resolve(&labels);
        assert!(binding.is_complete());

        assert!(binding.show_score(4));
        assert!(binding.show_best(9));
        assert_eq!(labels[2].text(), "Score: 4");
        assert_eq!(labels[1].text(), "Best Score: 9");
        assert_eq!(labels[0].text(), "");
    }

    #[test]
    fn test_first_match_wins() {
        let labels = vec![TextLabel::new(SCORE_TEXT), TextLabel::new(SCORE_TEXT)];
        let binding = DisplayBinding::resolve(&labels);
        binding.show_score(1);
        assert_eq!(labels[0].text(), "Score: 1");
        assert_eq!(labels[1].text(), "");
    }

    #[test]
    fn test_missing_label_is_reported() {
        let labels = vec![TextLabel::new(SCORE_TEXT)];
        let binding = DisplayBinding::resolve(&labels);
        assert!(!binding.is_complete());
        assert!(binding.show_score(0));
        assert!(!binding.show_best(0));
    }

    #[test]
    fn test_clones_share_text() {
        let label = TextLabel::new(SCORE_TEXT);
        let copy = label.clone();
        copy.set_text("hi");
        assert_eq!(label.text(), "hi");
        assert!(label.same_element(&copy));
        assert!(!label.same_element(&TextLabel::new(SCORE_TEXT)));
    }
}
