//! Group state of one page image.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::fit::{Extent, FitResult, FontFitSizer, TextMeasurer};
use crate::geometry::{FracRect, ImageSize};
use crate::layout::cluster::group_lines;
use crate::layout::params::Config;
use crate::text::{normalize_display_text, with_anchor};
use crate::types::{GroupId, LineId, LineMark, OcrLine};

/// A line as placed in an overlay group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLine {
    pub id: LineId,
    /// Display text: punctuation-normalized, anchored when first in its group.
    pub text: String,
    pub mark: LineMark,
}

/// A group as shown on the page, members in reading order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayGroup {
    pub id: GroupId,
    pub bbox: FracRect,
    pub lines: Vec<OverlayLine>,
}

impl OverlayGroup {
    pub fn is_merged(&self) -> bool {
        self.lines.iter().any(|l| l.mark.is_merged())
    }

    /// Display texts of all members, one per line.
    pub fn joined_text(&self) -> String {
        self.lines.iter().map(|l| l.text.as_str()).join("\n")
    }
}

/// A member box relative to its group box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemberLayout {
    pub line: LineId,
    pub rect: FracRect,
}

/// Fitted size of one member box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedLine {
    pub group: GroupId,
    pub line: LineId,
    pub fit: FitResult,
}

/// Lines and groups of one page image.
///
/// Every mutating operation takes `&mut self`; share a page across threads
/// through [`super::OverlayStore`], which locks each page separately.
#[derive(Debug, Clone)]
pub struct PageOverlay {
    pub(super) size: ImageSize,
    pub(super) lines: IndexMap<LineId, OcrLine>,
    pub(super) groups: Vec<OverlayGroup>,
    pub(super) selection: Vec<GroupId>,
    next_group: u32,
}

impl PageOverlay {
    /// Builds the overlay and runs the initial grouping.
    pub fn new(size: ImageSize, lines: Vec<OcrLine>, config: &Config) -> Self {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| (LineId(i as u32), line))
            .collect();
        let mut overlay = Self {
            size,
            lines,
            groups: Vec::new(),
            selection: Vec::new(),
            next_group: 0,
        };
        overlay.regroup(config);
        overlay
    }

    /// Discards all groups and clusters the current line set again.
    ///
    /// Manual merges are lost; deleted lines stay deleted.
    pub fn regroup(&mut self, config: &Config) {
        let ids: Vec<LineId> = self.lines.keys().copied().collect();
        let lines: Vec<OcrLine> = self.lines.values().cloned().collect();
        let groups = group_lines(&lines, self.size, config);

        self.selection.clear();
        self.groups = Vec::with_capacity(groups.len());
        for group in groups {
            let members = group
                .members
                .iter()
                .enumerate()
                .map(|(pos, &i)| {
                    let text = normalize_display_text(&lines[i].text);
                    OverlayLine {
                        id: ids[i],
                        text: if pos == 0 {
                            with_anchor(&text)
                        } else {
                            text.into_owned()
                        },
                        mark: LineMark::Plain,
                    }
                })
                .collect();
            let id = self.alloc_group_id();
            self.groups.push(OverlayGroup {
                id,
                bbox: group.bbox,
                lines: members,
            });
        }
    }

    fn alloc_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        id
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn groups(&self) -> &[OverlayGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&OverlayGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub(super) fn group_position(&self, id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    pub fn line(&self, id: LineId) -> Option<&OcrLine> {
        self.lines.get(&id)
    }

    /// Remaining lines in input order.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &OcrLine)> {
        self.lines.iter().map(|(id, line)| (*id, line))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn selection(&self) -> &[GroupId] {
        &self.selection
    }

    /// Adds or removes a group from the merge selection.
    ///
    /// Returns whether the group is selected afterwards; unknown ids are
    /// ignored.
    pub fn toggle_selection(&mut self, id: GroupId) -> bool {
        if self.group_position(id).is_none() {
            return false;
        }
        if let Some(pos) = self.selection.iter().position(|g| *g == id) {
            self.selection.remove(pos);
            false
        } else {
            self.selection.push(id);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Removes a group and its lines from the page.
    ///
    /// Returns false if no such group exists.
    pub fn delete_group(&mut self, id: GroupId) -> bool {
        let Some(pos) = self.group_position(id) else {
            return false;
        };
        let group = self.groups.remove(pos);
        for line in &group.lines {
            self.lines.shift_remove(&line.id);
        }
        self.selection.retain(|g| *g != id);
        true
    }

    /// Deletes every selected group and clears the selection.
    ///
    /// Returns the number of groups removed; stale ids are skipped.
    pub fn delete_selected(&mut self) -> usize {
        let selected = std::mem::take(&mut self.selection);
        selected
            .into_iter()
            .filter(|id| self.delete_group(*id))
            .count()
    }

    /// Member boxes relative to the group box, in reading order.
    ///
    /// Empty for a group box without area.
    pub fn member_layout(&self, group: &OverlayGroup) -> Vec<MemberLayout> {
        if !group.bbox.has_area() {
            return Vec::new();
        }
        group
            .lines
            .iter()
            .filter_map(|l| {
                let line = self.lines.get(&l.id)?;
                let rect = line.tight_bounding_box.relative_to(&group.bbox)?;
                Some(MemberLayout { line: l.id, rect })
            })
            .collect()
    }

    /// Fits every member box for an image displayed at `display` pixels.
    ///
    /// A manually merged group is fitted once, as its joined text in the
    /// group box, and every member gets that fit. Boxes with empty text or
    /// no room are skipped, as is everything when the display size is empty.
    pub fn size_boxes<M: TextMeasurer>(
        &self,
        display: Extent,
        sizer: &mut FontFitSizer<'_, M>,
    ) -> Vec<SizedLine> {
        let mut out = Vec::new();
        if !(display.width > 0.0 && display.height > 0.0) {
            return out;
        }
        for group in &self.groups {
            if let Some(first) = group.lines.first()
                && first.mark.is_merged()
            {
                let b = &group.bbox;
                let fit = sizer.fit(
                    &group.joined_text(),
                    b.width * display.width,
                    b.height * display.height,
                    first.mark,
                );
                if let Some(fit) = fit {
                    out.extend(group.lines.iter().map(|member| SizedLine {
                        group: group.id,
                        line: member.id,
                        fit,
                    }));
                }
                continue;
            }
            for member in &group.lines {
                let Some(line) = self.lines.get(&member.id) else {
                    continue;
                };
                let b = &line.tight_bounding_box;
                let fit = sizer.fit(
                    &member.text,
                    b.width * display.width,
                    b.height * display.height,
                    member.mark,
                );
                if let Some(fit) = fit {
                    out.push(SizedLine {
                        group: group.id,
                        line: member.id,
                        fit,
                    });
                }
            }
        }
        out
    }
}
