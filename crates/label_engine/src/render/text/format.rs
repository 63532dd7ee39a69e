//! Inline format codes
//!
//! A format code is the escape character `§` followed by one letter of
//! [`CODE_ALPHABET`]. The letter's position in the alphabet decides what it
//! does, matching the legacy convention existing label text is written in.

use super::palette;

/// Character that introduces a format code
pub const ESCAPE: char = '\u{00A7}';

/// Code letters; a letter's index is its meaning
pub const CODE_ALPHABET: &str = "0123456789abcdefklmnor";

/// A recognized format code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    /// Palette color 0-15; clears all styles
    Color(u8),
    /// Scramble glyphs (`k`)
    Obfuscated,
    /// Bold (`l`), accepted but not rendered
    Bold,
    /// Line through the text (`m`)
    Strikethrough,
    /// Line under the text (`n`)
    Underline,
    /// Italic (`o`), accepted but not rendered
    Italic,
    /// Back to the base color, all styles cleared (`r`)
    Reset,
}

impl FormatCode {
    /// Decode a code letter
    ///
    /// Returns `None` for letters outside the alphabet, upper case included.
    pub fn from_char(letter: char) -> Option<Self> {
        let index = CODE_ALPHABET.chars().position(|c| c == letter)?;
        Some(match index {
            0..=15 => Self::Color(index as u8),
            16 => Self::Obfuscated,
            17 => Self::Bold,
            18 => Self::Strikethrough,
            19 => Self::Underline,
            20 => Self::Italic,
            _ => Self::Reset,
        })
    }
}

/// Style state carried through one measure or draw pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatState {
    /// Active palette color, `None` while the base color applies
    pub color_index: Option<u8>,
    /// Strikethrough active
    pub strikethrough: bool,
    /// Underline active
    pub underline: bool,
    /// Obfuscation active
    pub obfuscated: bool,
    /// Alpha of the base color, applied to every palette color
    pub base_alpha: f32,
}

impl FormatState {
    /// Fresh state for a pass drawn in a base color with this alpha
    pub fn new(base_alpha: f32) -> Self {
        Self {
            color_index: None,
            strikethrough: false,
            underline: false,
            obfuscated: false,
            base_alpha,
        }
    }

    /// Apply one format code
    pub fn apply(&mut self, code: FormatCode) {
        match code {
            FormatCode::Color(index) => {
                self.color_index = Some(index);
                self.clear_styles();
            }
            FormatCode::Obfuscated => self.obfuscated = true,
            FormatCode::Strikethrough => self.strikethrough = true,
            FormatCode::Underline => self.underline = true,
            FormatCode::Bold | FormatCode::Italic => {}
            FormatCode::Reset => {
                self.color_index = None;
                self.clear_styles();
            }
        }
    }

    /// Packed `0xRRGGBB` of the active color
    ///
    /// `base_rgb` is the caller's color, used until a color code appears.
    pub fn rgb(&self, base_rgb: u32) -> u32 {
        self.color_index
            .and_then(|index| palette::color(index as usize))
            .unwrap_or(base_rgb & 0x00FF_FFFF)
    }

    fn clear_styles(&mut self) {
        self.strikethrough = false;
        self.underline = false;
        self.obfuscated = false;
    }
}

/// One step of scanning formatted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A character to place
    Char(char),
    /// A recognized format code
    Code(FormatCode),
    /// An escape with an unknown letter, or a trailing escape
    Ignored,
}

/// Split formatted text into tokens
///
/// Escape plus letter always consume two characters; a lone escape at the end
/// of the text yields [`Token::Ignored`].
pub fn tokens(text: &str) -> impl Iterator<Item = Token> + '_ {
    let mut chars = text.chars();
    std::iter::from_fn(move || {
        let ch = chars.next()?;
        if ch != ESCAPE {
            return Some(Token::Char(ch));
        }
        Some(match chars.next().and_then(FormatCode::from_char) {
            Some(code) => Token::Code(code),
            None => Token::Ignored,
        })
    })
}

/// Style state after applying every code in `text` to `initial`
pub fn state_after(text: &str, initial: FormatState) -> FormatState {
    tokens(text).fold(initial, |mut state, token| {
        if let Token::Code(code) = token {
            state.apply(code);
        }
        state
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_positions() {
        assert_eq!(FormatCode::from_char('0'), Some(FormatCode::Color(0)));
        assert_eq!(FormatCode::from_char('c'), Some(FormatCode::Color(12)));
        assert_eq!(FormatCode::from_char('f'), Some(FormatCode::Color(15)));
        assert_eq!(FormatCode::from_char('k'), Some(FormatCode::Obfuscated));
        assert_eq!(FormatCode::from_char('l'), Some(FormatCode::Bold));
        assert_eq!(FormatCode::from_char('m'), Some(FormatCode::Strikethrough));
        assert_eq!(FormatCode::from_char('n'), Some(FormatCode::Underline));
        assert_eq!(FormatCode::from_char('o'), Some(FormatCode::Italic));
        assert_eq!(FormatCode::from_char('r'), Some(FormatCode::Reset));
        assert_eq!(FormatCode::from_char('C'), None);
        assert_eq!(FormatCode::from_char('K'), None);
        assert_eq!(FormatCode::from_char('R'), None);
        assert_eq!(FormatCode::from_char('z'), None);
        assert_eq!(FormatCode::from_char('§'), None);
    }

    #[test]
    fn test_color_clears_styles() {
        let mut state = FormatState::new(1.0);
        state.apply(FormatCode::Underline);
        state.apply(FormatCode::Obfuscated);
        state.apply(FormatCode::Color(4));
        assert_eq!(state.color_index, Some(4));
        assert!(!state.underline);
        assert!(!state.obfuscated);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let initial = FormatState::new(0.5);
        let mut state = initial;
        for code in [FormatCode::Color(9), FormatCode::Strikethrough, FormatCode::Obfuscated] {
            state.apply(code);
        }
        state.apply(FormatCode::Reset);
        assert_eq!(state, initial);

        let mut state = initial;
        state.apply(FormatCode::Reset);
        assert_eq!(state, initial);
    }

    #[test]
    fn test_rgb_falls_back_to_base() {
        let mut state = FormatState::new(1.0);
        assert_eq!(state.rgb(0xFF12_3456), 0x12_3456);
        state.apply(FormatCode::Color(12));
        assert_eq!(state.rgb(0xFF12_3456), 0xFF_5555);
    }

    #[test]
    fn test_leading_reset_is_idempotent() {
        let initial = FormatState::new(1.0);
        assert_eq!(state_after("§r", initial), initial);
        assert_eq!(state_after("§rplain text", initial), initial);
        assert_eq!(state_after("§n§cA§r", initial), initial);
        assert_ne!(state_after("§rA§n", initial), initial);
    }

    #[test]
    fn test_tokens() {
        let scanned: Vec<_> = tokens("§cA§zB§").collect();
        assert_eq!(
            scanned,
            vec![
                Token::Code(FormatCode::Color(12)),
                Token::Char('A'),
                Token::Ignored,
                Token::Char('B'),
                Token::Ignored,
            ]
        );
    }
}
