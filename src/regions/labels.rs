use super::Region;

/// Horizontal extent `[left, right)` a region's label occupies, in content
/// pixels. Labels are at least as wide as their region.
pub fn label_projection(region: &Region, total_width: f64, duration: f64) -> Option<(f64, f64)> {
    let label = region.label()?;
    let (left, width) = region.pixel_span(total_width, duration);
    Some((left, left + width.max(label.width)))
}

/// Vertical offset for `target`'s label: the summed label heights of every
/// region in `others` whose projection intersects it.
pub fn overlap_offset<'a>(
    target: &Region,
    others: impl IntoIterator<Item = &'a Region>,
    total_width: f64,
    duration: f64,
) -> f64 {
    let Some((left, right)) = label_projection(target, total_width, duration) else {
        return 0.0;
    };
    others
        .into_iter()
        .filter(|other| other.id() != target.id())
        .filter_map(|other| {
            let (other_left, other_right) = label_projection(other, total_width, duration)?;
            let height = other.label()?.height;
            (left < other_right && other_left < right).then_some(height)
        })
        .sum()
}
