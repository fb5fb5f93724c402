//! Per-character reveal timing.
//!
//! Every character except line breaks takes `1 / chars_per_sec` seconds. Punctuation
//! schedules a pause that is paid before the next character, so a pause at the very
//! end of a line never delays it. A line break adds only a long pause.
//!
//! A literal `...` reads as one beat: the first dot keeps the regular pace, the
//! ellipsis pause is paid before the second dot, and the third dot adds no sentence
//! pause of its own.

use crate::reveal::RevealParams;

/// Cumulative reveal times for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealCurve {
    /// `fractions[i]` is the normalized time at which `i` characters are shown.
    /// Non-decreasing, starts at 0 and ends at 1.
    pub fractions: Vec<f32>,
    /// Total reveal time in seconds.
    pub duration: f32,
}

impl RevealCurve {
    /// Number of characters the curve reveals.
    pub fn char_count(&self) -> usize {
        self.fractions.len().saturating_sub(1)
    }

    pub fn chars_at(&self, elapsed: f32) -> usize {
        chars_to_show(&self.fractions, elapsed, self.duration)
    }
}

/// Build the reveal curve for `text`, or `None` when it has no characters to reveal.
pub fn reveal_curve(text: &str, params: &RevealParams) -> Option<RevealCurve> {
    let step = if params.chars_per_sec > 0.0 {
        1.0 / params.chars_per_sec
    } else {
        0.0
    };
    let short = params.pause_short.max(0.0);
    let long = params.pause_long.max(0.0);

    let chars: Vec<char> = text.chars().collect();
    let mut times = vec![0.0f32];
    let mut total = 0.0f32;
    let mut pending = 0.0f32;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '\n' {
            pending = pending.max(long);
            i += 1;
            continue;
        }

        total += pending + step;
        pending = 0.0;
        times.push(total);

        match ch {
            '.' if chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') => {
                total += params.pause_ellipsis.max(0.0) + step;
                times.push(total);
                total += step;
                times.push(total);
                i += 2;
            }
            ',' | ';' | ':' => pending = pending.max(short),
            '.' | '!' | '?' => pending = pending.max(long),
            _ => {}
        }
        i += 1;
    }

    if times.len() == 1 {
        return None;
    }

    let fractions = if total > 0.0 {
        times.iter().map(|t| t / total).collect()
    } else {
        let mut flat = vec![1.0; times.len()];
        flat[0] = 0.0;
        flat
    };

    Some(RevealCurve {
        fractions,
        duration: total.max(0.0),
    })
}

/// Characters visible after `elapsed` seconds of a `duration`-long reveal.
pub fn chars_to_show(curve: &[f32], elapsed: f32, duration: f32) -> usize {
    let total = curve.len().saturating_sub(1);
    if duration <= 0.0 || elapsed >= duration {
        return total;
    }
    let f = (elapsed / duration).max(0.0);
    curve.get(1..).map_or(0, |tail| tail.partition_point(|&c| c <= f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RevealParams {
        RevealParams {
            chars_per_sec: 10.0,
            pause_short: 0.5,
            pause_long: 1.0,
            pause_ellipsis: 2.0,
            ..RevealParams::default()
        }
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_constant_rate() {
        let curve = reveal_curve("abcd", &params()).unwrap();
        assert_eq!(curve.char_count(), 4);
        assert_close(curve.duration, 0.4);
        assert_close(curve.fractions[2], 0.5);
    }

    #[test]
    fn test_curve_shape() {
        let curve = reveal_curve("Hi, there. Wait... what?!\nYes", &params()).unwrap();
        assert_eq!(curve.fractions.len(), "Hi, there. Wait... what?!Yes".chars().count() + 1);
        assert_eq!(curve.fractions[0], 0.0);
        assert_close(*curve.fractions.last().unwrap(), 1.0);
        assert!(curve.fractions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_short_pause_before_next_char() {
        // "a,b": a at 0.1, comma at 0.2, b after the short pause at 0.8
        let curve = reveal_curve("a,b", &params()).unwrap();
        assert_close(curve.duration, 0.8);
        assert_close(curve.fractions[2], 0.2 / 0.8);
    }

    #[test]
    fn test_trailing_pause_dropped() {
        let curve = reveal_curve("ok.", &params()).unwrap();
        assert_close(curve.duration, 0.3);
    }

    #[test]
    fn test_newline_adds_long_pause_only() {
        let curve = reveal_curve("a\nb", &params()).unwrap();
        assert_eq!(curve.char_count(), 2);
        assert_close(curve.duration, 1.2);
    }

    #[test]
    fn test_ellipsis() {
        // a(.1) .(.2) [2.0] .(2.3) .(2.4) b(2.5)
        let curve = reveal_curve("a...b", &params()).unwrap();
        assert_close(curve.duration, 2.5);
        assert_close(curve.fractions[2] * curve.duration, 0.2);
        assert_close(curve.fractions[3] * curve.duration, 2.3);
        assert_close(curve.fractions[4] * curve.duration, 2.4);
    }

    #[test]
    fn test_no_visible_chars() {
        assert!(reveal_curve("", &params()).is_none());
        assert!(reveal_curve("\n\n", &params()).is_none());
    }

    #[test]
    fn test_zero_rate() {
        let p = RevealParams {
            chars_per_sec: 0.0,
            ..params()
        };
        let curve = reveal_curve("ab", &p).unwrap();
        assert_eq!(curve.duration, 0.0);
        assert_eq!(curve.fractions, vec![0.0, 1.0, 1.0]);
        assert_eq!(curve.chars_at(0.0), 2);
    }

    #[test]
    fn test_chars_to_show() {
        let curve = reveal_curve("abcd", &params()).unwrap();
        assert_eq!(curve.chars_at(0.0), 0);
        assert_eq!(curve.chars_at(0.1), 1);
        assert_eq!(curve.chars_at(0.25), 2);
        assert_eq!(curve.chars_at(0.45), 4);
        assert_eq!(curve.chars_at(9.0), 4);
    }

    #[test]
    fn test_chars_to_show_monotone() {
        let curve = reveal_curve("Well, well... fine!", &params()).unwrap();
        let mut last = 0;
        for step in 0..=100 {
            let shown = curve.chars_at(curve.duration * step as f32 / 100.0);
            assert!(shown >= last);
            last = shown;
        }
        assert_eq!(last, curve.char_count());
    }
}
