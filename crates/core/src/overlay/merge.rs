//! Manual merge of user-selected groups.

use tracing::debug;

use crate::geometry::{BBox, Orientation};
use crate::layout::params::Config;
use crate::layout::sort::{SortRule, group_bbox, sort_reading_order};
use crate::text::{strip_anchor, with_anchor};
use crate::types::{GroupId, LineMark};

use super::page::{OverlayLine, PageOverlay};

/// Why a merge request left the page untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSkip {
    /// Fewer than two live groups were named.
    TooFewGroups,
    /// The page dimensions are unknown.
    UnknownImageSize,
    /// The merged box would have no area.
    EmptyBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The groups were merged into the group with this id.
    Merged(GroupId),
    Skipped(MergeSkip),
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeOutcome::Merged(_))
    }
}

impl PageOverlay {
    /// Merges the current selection; see [`PageOverlay::merge_groups`].
    pub fn merge_selected(&mut self, config: &Config) -> MergeOutcome {
        let selected = std::mem::take(&mut self.selection);
        self.merge_groups(&selected, config)
    }

    /// Merges the named groups into one, in reading order.
    ///
    /// The first named group absorbs the others and keeps its id and its
    /// position in the group list. Members are re-sorted with the column
    /// rule, the anchor moves to the new first line, and every member is
    /// marked with the merged group's orientation. Unknown or repeated ids
    /// are skipped. The selection is cleared whatever the outcome.
    pub fn merge_groups(&mut self, ids: &[GroupId], config: &Config) -> MergeOutcome {
        self.selection.clear();

        let mut positions: Vec<usize> = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(pos) = self.group_position(id)
                && !positions.contains(&pos)
            {
                positions.push(pos);
            }
        }
        if positions.len() < 2 {
            debug!(
                requested = ids.len(),
                live = positions.len(),
                "merge skipped: too few groups"
            );
            return MergeOutcome::Skipped(MergeSkip::TooFewGroups);
        }
        if !self.size.is_known() {
            debug!("merge skipped: unknown image size");
            return MergeOutcome::Skipped(MergeSkip::UnknownImageSize);
        }

        let size = self.size;
        let mut members: Vec<(OverlayLine, BBox)> = positions
            .iter()
            .flat_map(|&pos| self.groups[pos].lines.iter())
            .filter_map(|member| {
                let line = self.lines.get(&member.id)?;
                Some((member.clone(), line.tight_bounding_box.to_canonical(size)))
            })
            .collect();

        let Some(union) = group_bbox(&members, |m| m.1) else {
            return MergeOutcome::Skipped(MergeSkip::EmptyBox);
        };
        let bbox = union.to_frac(size);
        if !bbox.has_area() {
            debug!("merge skipped: empty merged box");
            return MergeOutcome::Skipped(MergeSkip::EmptyBox);
        }

        let rule = SortRule::Column {
            column_tolerance: config.column_tolerance,
            tolerance: config.sort_tolerance,
        };
        let orientation = sort_reading_order(&mut members, |m| m.1, rule)
            .unwrap_or(Orientation::Horizontal);

        let lines: Vec<OverlayLine> = members
            .into_iter()
            .enumerate()
            .map(|(pos, (mut line, _))| {
                line.text = if pos == 0 {
                    with_anchor(&line.text)
                } else {
                    strip_anchor(&line.text).to_string()
                };
                line.mark = LineMark::MergedAnchor(orientation);
                line
            })
            .collect();

        let target = positions[0];
        let target_id = self.groups[target].id;
        let absorbed = positions.len() - 1;
        self.groups[target].lines = lines;
        self.groups[target].bbox = bbox;

        let mut rest = positions[1..].to_vec();
        rest.sort_unstable();
        for pos in rest.into_iter().rev() {
            self.groups.remove(pos);
        }

        debug!(
            group = target_id.0,
            absorbed,
            vertical = orientation.is_vertical(),
            "merged groups"
        );
        MergeOutcome::Merged(target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FracRect, ImageSize};
    use crate::text::has_anchor;
    use crate::types::{LineId, OcrLine};

    fn no_auto() -> Config {
        Config {
            auto_merge_enabled: false,
            ..Config::default()
        }
    }

    /// Two vertical columns on a 1000x1000 page, left one listed first.
    fn columns() -> PageOverlay {
        let lines = vec![
            OcrLine::new("ひだり", FracRect::new(0.40, 0.1, 0.04, 0.3)),
            OcrLine::new("みぎ", FracRect::new(0.46, 0.1, 0.04, 0.3)),
        ];
        PageOverlay::new(ImageSize::new(1000, 1000), lines, &no_auto())
    }

    #[test]
    fn merge_sorts_right_column_first() {
        let mut p = columns();
        let (left, right) = (p.groups()[0].id, p.groups()[1].id);
        p.toggle_selection(left);
        p.toggle_selection(right);

        assert_eq!(p.merge_selected(&no_auto()), MergeOutcome::Merged(left));
        assert!(p.selection().is_empty());
        assert_eq!(p.groups().len(), 1);

        let g = &p.groups()[0];
        let ids: Vec<LineId> = g.lines.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![LineId(1), LineId(0)]);
        assert!(has_anchor(&g.lines[0].text));
        assert!(!has_anchor(&g.lines[1].text));
        assert!(g.lines.iter().all(|l| l.mark.forces_vertical()));
        assert!((g.bbox.x - 0.40).abs() < 1e-12);
        assert!((g.bbox.width - 0.10).abs() < 1e-12);
    }

    #[test]
    fn single_or_stale_selection_is_a_no_op() {
        let mut p = columns();
        let left = p.groups()[0].id;
        p.toggle_selection(left);
        let out = p.merge_groups(&[left, left, GroupId(42)], &no_auto());
        assert_eq!(out, MergeOutcome::Skipped(MergeSkip::TooFewGroups));
        assert_eq!(p.groups().len(), 2);
        assert!(p.selection().is_empty());
    }

    #[test]
    fn unknown_size_refuses_to_merge() {
        let lines = vec![
            OcrLine::new("a", FracRect::new(0.1, 0.1, 0.1, 0.1)),
            OcrLine::new("b", FracRect::new(0.3, 0.1, 0.1, 0.1)),
        ];
        let mut p = PageOverlay::new(ImageSize::default(), lines, &Config::default());
        let ids: Vec<GroupId> = p.groups().iter().map(|g| g.id).collect();
        let out = p.merge_groups(&ids, &Config::default());
        assert_eq!(out, MergeOutcome::Skipped(MergeSkip::UnknownImageSize));
    }

    #[test]
    fn zero_area_union_is_rejected() {
        let lines = vec![
            OcrLine::new("a", FracRect::new(0.1, 0.1, 0.0, 0.1)),
            OcrLine::new("b", FracRect::new(0.1, 0.3, 0.0, 0.1)),
        ];
        let mut p = PageOverlay::new(ImageSize::new(800, 1200), lines, &no_auto());
        let ids: Vec<GroupId> = p.groups().iter().map(|g| g.id).collect();
        let out = p.merge_groups(&ids, &no_auto());
        assert_eq!(out, MergeOutcome::Skipped(MergeSkip::EmptyBox));
        assert_eq!(p.groups().len(), 2);
    }
}
