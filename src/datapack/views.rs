//! Derived views of a datapack
//!
//! The same pairings are looked at with different targets depending on the
//! task: attachment (`1` attached / `-1` not), labelling (gold label number)
//! and intra-sentential decoding (gold sentence roots exposed on the edges
//! leaving the fake root).

use super::Datapack;
use crate::error::Result;
use crate::types::{ROOT_LABEL, UNRELATED};
use std::collections::HashSet;

/// Attachment target for an attached pair
pub const ATTACHED: i64 = 1;

/// Attachment target for an unattached pair
pub const NOT_ATTACHED: i64 = -1;

impl Datapack {
    /// View whose targets say whether each pair is attached
    pub fn for_attachment(&self) -> Result<Datapack> {
        let unrelated = self.label_number(UNRELATED)?;
        let target = self
            .target()
            .iter()
            .map(|&t| if t == unrelated { NOT_ATTACHED } else { ATTACHED })
            .collect();
        Ok(self.with_target(target))
    }

    /// View whose targets are gold label numbers
    pub fn for_labelling(&self) -> Datapack {
        self.clone()
    }

    /// View for intra-sentential decoding.
    ///
    /// An edge from the fake root to an EDU is labelled `ROOT` when that EDU
    /// has no gold parent inside its own subgrouping (it heads its sentence),
    /// and `UNRELATED` otherwise. Other pairs keep their gold labels.
    pub fn for_intra(&self) -> Result<Datapack> {
        let unrelated = self.label_number(UNRELATED)?;

        let mut labels = self.labels().to_vec();
        if !labels.iter().any(|l| l == ROOT_LABEL) {
            labels.push(ROOT_LABEL.to_string());
        }
        let root = labels.iter().position(|l| l == ROOT_LABEL).unwrap_or_default() as i64;

        let locally_attached: HashSet<_> = self
            .pairings()
            .iter()
            .zip(self.target())
            .filter(|((s, t), lbl)| !s.is_root() && s.subgrouping == t.subgrouping && **lbl != unrelated)
            .map(|((_, t), _)| t.id.clone())
            .collect();

        let target = self
            .pairings()
            .iter()
            .zip(self.target())
            .map(|((s, t), &lbl)| {
                if !s.is_root() {
                    lbl
                } else if locally_attached.contains(&t.id) {
                    unrelated
                } else {
                    root
                }
            })
            .collect();

        Ok(self.with_target(target).with_labels(labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapack::tests::two_doc_pack;
    use crate::types::{Edu, EduId};

    #[test]
    fn test_for_attachment() {
        let dpack = two_doc_pack();
        let attach = dpack.for_attachment().unwrap();
        assert_eq!(attach.target(), &[1, 1, -1, 1, -1, 1, 1]);
        assert_eq!(attach.len(), dpack.len());
    }

    #[test]
    fn test_for_labelling_keeps_gold() {
        let dpack = two_doc_pack();
        assert_eq!(dpack.for_labelling().target(), dpack.target());
    }

    #[test]
    fn test_for_intra_marks_sentence_heads() {
        // b has a gold parent inside s1; c is alone in s2 and only attached
        // across sentences, so it heads s2.
        let edus = vec![
            Edu::new("a", 1, "s1", "d"),
            Edu::new("b", 2, "s1", "d"),
            Edu::new("c", 3, "s2", "d"),
        ];
        let pairs = [
            ("ROOT", "a", "ROOT"),
            ("ROOT", "b", UNRELATED),
            ("ROOT", "c", UNRELATED),
            ("a", "b", "elaboration"),
            ("a", "c", "narration"),
        ];
        let dpack = Datapack::new(
            edus,
            pairs.iter().map(|(x, y, _)| (EduId::from(*x), EduId::from(*y))).collect(),
            Vec::new(),
            pairs.iter().map(|(_, _, l)| l.to_string()).collect(),
        )
        .unwrap();

        let intra = dpack.for_intra().unwrap();
        let labels: Vec<_> = intra.target().iter().map(|&t| intra.get_label(t).unwrap()).collect();
        assert_eq!(labels, vec!["ROOT", UNRELATED, "ROOT", "elaboration", "narration"]);
    }

    #[test]
    fn test_for_intra_adds_root_label() {
        let edus = vec![Edu::new("a", 1, "s1", "d"), Edu::new("b", 2, "s1", "d")];
        let dpack = Datapack::new(
            edus,
            vec![
                (EduId::from("ROOT"), EduId::from("a")),
                (EduId::from("a"), EduId::from("b")),
            ],
            Vec::new(),
            vec!["elaboration".into(), "elaboration".into()],
        )
        .unwrap();
        assert!(dpack.label_number(ROOT_LABEL).is_err());

        let intra = dpack.for_intra().unwrap();
        assert_eq!(intra.get_label(intra.target()[0]).unwrap(), ROOT_LABEL);
    }
}
