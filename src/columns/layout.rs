//! Column width resolution
//!
//! Resolves `basis`/`grow`/`shrink` with `min`/`max` clamping the way a flex row
//! does: distribute free space, freeze the items that violate their limits,
//! redistribute among the rest.

/// Flex parameters of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    pub basis: f32,
    pub grow: f32,
    pub shrink: f32,
    pub min: f32,
    pub max: Option<f32>,
}

impl FlexItem {
    fn clamp(&self, size: f32) -> f32 {
        let capped = match self.max {
            Some(max) => size.min(max),
            None => size,
        };
        capped.max(self.min)
    }
}

/// Resolved pixel widths and cumulative right edges, gutter first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    pub widths: Vec<f32>,
    /// `rights[i]` is the right edge of column `i` measured from the gutter's left edge
    pub rights: Vec<f32>,
}

impl ColumnLayout {
    pub fn resolve(items: &[FlexItem], available_width: f32) -> Self {
        let widths = resolve_widths(items, available_width);
        let mut rights = Vec::with_capacity(widths.len());
        let mut edge = 0.0;
        for width in &widths {
            edge += width;
            rights.push(edge);
        }
        Self { widths, rights }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of all column widths
    pub fn total_width(&self) -> f32 {
        self.rights.last().copied().unwrap_or(0.0)
    }
}

fn resolve_widths(items: &[FlexItem], available: f32) -> Vec<f32> {
    if available <= 0.0 {
        return items.iter().map(|item| item.clamp(item.basis)).collect();
    }

    let mut sizes: Vec<f32> = items.iter().map(|item| item.basis).collect();
    let mut frozen = vec![false; items.len()];

    // Every pass freezes at least one item, so this terminates in len + 1 passes
    for _ in 0..=items.len() {
        let used: f32 = items
            .iter()
            .enumerate()
            .map(|(i, item)| if frozen[i] { sizes[i] } else { item.basis })
            .sum();
        let free = available - used;

        let open: Vec<usize> = (0..items.len()).filter(|&i| !frozen[i]).collect();
        if open.is_empty() {
            break;
        }

        let targets: Vec<f32> = if free >= 0.0 {
            let total_grow: f32 = open.iter().map(|&i| items[i].grow).sum();
            open.iter()
                .map(|&i| {
                    let share = if total_grow > 0.0 {
                        free * items[i].grow / total_grow
                    } else {
                        0.0
                    };
                    items[i].basis + share
                })
                .collect()
        } else {
            let total_scaled: f32 = open.iter().map(|&i| items[i].shrink * items[i].basis).sum();
            open.iter()
                .map(|&i| {
                    let share = if total_scaled > 0.0 {
                        free * items[i].shrink * items[i].basis / total_scaled
                    } else {
                        0.0
                    };
                    items[i].basis + share
                })
                .collect()
        };

        let mut total_violation = 0.0;
        let mut violations = Vec::with_capacity(open.len());
        for (slot, &i) in open.iter().enumerate() {
            let clamped = items[i].clamp(targets[slot]);
            let violation = clamped - targets[slot];
            total_violation += violation;
            violations.push(violation);
            sizes[i] = clamped;
        }

        if total_violation.abs() < f32::EPSILON {
            break;
        }

        for (slot, &i) in open.iter().enumerate() {
            let violation = violations[slot];
            if (total_violation > 0.0 && violation > 0.0) || (total_violation < 0.0 && violation < 0.0)
            {
                frozen[i] = true;
            }
        }
    }

    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(px: f32) -> FlexItem {
        FlexItem {
            basis: px,
            grow: 0.0,
            shrink: 0.0,
            min: 0.0,
            max: None,
        }
    }

    fn flex(grow: f32) -> FlexItem {
        FlexItem {
            basis: 0.0,
            grow,
            shrink: 1.0,
            min: 100.0,
            max: None,
        }
    }

    #[test]
    fn test_free_space_split_by_grow() {
        let layout = ColumnLayout::resolve(&[fixed(40.0), flex(1.0), flex(1.0)], 440.0);
        assert_eq!(layout.widths, vec![40.0, 200.0, 200.0]);
        assert_eq!(layout.rights, vec![40.0, 240.0, 440.0]);
    }

    #[test]
    fn test_min_width_freezes_and_redistributes() {
        // 1:3 split of 300 would give 75 to the first column, below its 100 minimum
        let layout = ColumnLayout::resolve(&[flex(1.0), flex(3.0)], 300.0);
        assert_eq!(layout.widths, vec![100.0, 200.0]);
    }

    #[test]
    fn test_max_width_caps_growth() {
        let mut capped = flex(1.0);
        capped.max = Some(150.0);
        let layout = ColumnLayout::resolve(&[capped, flex(1.0)], 500.0);
        assert_eq!(layout.widths, vec![150.0, 350.0]);
    }

    #[test]
    fn test_unknown_width_uses_clamped_basis() {
        let layout = ColumnLayout::resolve(&[fixed(40.0), flex(1.0)], 0.0);
        assert_eq!(layout.widths, vec![40.0, 100.0]);
        assert_eq!(layout.total_width(), 140.0);
    }

    #[test]
    fn test_overflow_keeps_minimums() {
        let layout = ColumnLayout::resolve(&[fixed(40.0), flex(1.0), flex(1.0)], 120.0);
        assert_eq!(layout.widths, vec![40.0, 100.0, 100.0]);
    }
}
