//! Tiny fonts for the map: 3×5 bitmap text and seven-segment digits.

use glam::IVec2;

use super::clip::FrameLine;
use super::raster::{FrameBuffer, FrameRect};

/// Glyph cell, including one column/row of spacing.
pub const CELL_W: i32 = 4;
pub const CELL_H: i32 = 6;

/// Rows of a 3×5 glyph, top row first, bit 2 = left column.
fn bitmap(ch: char) -> [u8; 5] {
    match ch.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ' ' => [0; 5],
        _ => [0b111, 0b101, 0b101, 0b101, 0b111],
    }
}

/// Write `text` with its top-left corner at `at`; pixels outside `rect`
/// are dropped.  Returns the width used.
pub fn put_string(fb: &mut FrameBuffer, rect: FrameRect, at: IVec2, text: &str, color: u8) -> i32 {
    let mut x = at.x;
    for ch in text.chars() {
        for (row, bits) in bitmap(ch).iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    fb.put(rect, IVec2::new(x + col, at.y + row as i32), color);
                }
            }
        }
        x += CELL_W;
    }
    x - at.x
}

/*──────────────────────── seven-segment digits ───────────────────────*/

// segment endpoints inside a 4×5 box: a b c d e f g
const SEGMENTS: [(IVec2, IVec2); 7] = [
    (IVec2::new(0, 0), IVec2::new(3, 0)),
    (IVec2::new(3, 0), IVec2::new(3, 2)),
    (IVec2::new(3, 2), IVec2::new(3, 4)),
    (IVec2::new(0, 4), IVec2::new(3, 4)),
    (IVec2::new(0, 2), IVec2::new(0, 4)),
    (IVec2::new(0, 0), IVec2::new(0, 2)),
    (IVec2::new(0, 2), IVec2::new(3, 2)),
];

const DIGIT_MASKS: [u8; 10] = [
    0b0111111, // 0
    0b0000110, // 1
    0b1011011, // 2
    0b1001111, // 3
    0b1100110, // 4
    0b1101101, // 5
    0b1111101, // 6
    0b0000111, // 7
    0b1111111, // 8
    0b1101111, // 9
];

/// Line segments of `digit` with the box's top-left at `at`.
pub fn digit_lines(digit: usize, at: IVec2) -> impl Iterator<Item = FrameLine> {
    let mask = DIGIT_MASKS[digit % 10];
    SEGMENTS
        .into_iter()
        .enumerate()
        .filter(move |&(i, _)| mask & (1 << i) != 0)
        .map(move |(_, (a, b))| FrameLine::new(at + a, at + b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_is_two_right_segments() {
        let lines: Vec<_> = digit_lines(1, IVec2::new(10, 20)).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.a.x == 13 && l.b.x == 13));
    }

    #[test]
    fn eight_lights_all_segments() {
        assert_eq!(digit_lines(8, IVec2::ZERO).count(), 7);
        assert_eq!(digit_lines(0, IVec2::ZERO).count(), 6);
    }

    #[test]
    fn string_is_clipped_to_rect() {
        let mut fb = FrameBuffer::new(8, 8);
        let rect = FrameRect::new(0, 0, 8, 8);
        let w = put_string(&mut fb, rect, IVec2::new(0, 0), "E1M1", 5);
        assert_eq!(w, 16);
        // 'E' top row fully lit
        assert_eq!((0..3).map(|x| fb.get(x, 0)).collect::<Vec<_>>(), vec![Some(5); 3]);
        // '1' top row is the middle column only
        assert_eq!(fb.get(4, 0), Some(0));
        assert_eq!(fb.get(5, 0), Some(5));
    }
}
