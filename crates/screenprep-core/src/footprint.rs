/// Disk-shaped structuring element, stored as horizontal half-widths per row.
///
/// Row `i` (for `dy = i - radius`) covers columns `-half_widths[i]..=half_widths[i]`.
/// A radius of 0 is the single center pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disk {
    radius: usize,
    half_widths: Vec<usize>,
}

impl Disk {
    pub fn new(radius: usize) -> Self {
        let r = radius as f64;
        let half_widths = (0..=2 * radius)
            .map(|i| {
                let dy = i as f64 - r;
                (r * r - dy * dy).max(0.0).sqrt().floor() as usize
            })
            .collect();
        Self {
            radius,
            half_widths,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// `(dy, half_width)` for every row of the disk, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = (isize, usize)> + '_ {
        let r = self.radius as isize;
        self.half_widths
            .iter()
            .enumerate()
            .map(move |(i, &hw)| (i as isize - r, hw))
    }

    /// Number of pixels in the disk.
    pub fn area(&self) -> usize {
        self.half_widths.iter().map(|&hw| 2 * hw + 1).sum()
    }
}
