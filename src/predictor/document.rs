//! Hierarchical OCR output: document, pages, blocks, lines and words.

use serde::Serialize;

/// A recognized word with its page-relative geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub value: String,
    pub confidence: f32,
    /// `((xmin, ymin), (xmax, ymax))`, relative to the page size.
    pub geometry: ((f32, f32), (f32, f32)),
}

impl Word {
    pub fn new(value: impl Into<String>, confidence: f32, geometry: [f32; 4]) -> Self {
        let [x1, y1, x2, y2] = geometry;
        Self {
            value: value.into(),
            confidence,
            geometry: ((x1, y1), (x2, y2)),
        }
    }

    fn y_min(&self) -> f32 {
        self.geometry.0.1
    }

    fn y_max(&self) -> f32 {
        self.geometry.1.1
    }

    fn y_center(&self) -> f32 {
        (self.y_min() + self.y_max()) / 2.0
    }
}

/// Words sharing a baseline, left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    fn y_span(&self) -> (f32, f32) {
        self.words.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), w| {
            (lo.min(w.y_min()), hi.max(w.y_max()))
        })
    }
}

/// Consecutive lines without a paragraph break.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// `(height, width)` in pixels.
    pub dimensions: (u32, u32),
    pub blocks: Vec<Block>,
}

impl Page {
    /// Words in block, line, word order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.words.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// All words of all pages in traversal order.
    pub fn flatten_words(&self) -> Vec<&Word> {
        self.pages.iter().flat_map(Page::words).collect()
    }
}

/// Arranges loose word predictions into lines and blocks.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    /// Relative vertical gap between two lines that starts a new block.
    pub paragraph_break: f32,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paragraph_break: 0.035,
        }
    }
}

impl DocumentBuilder {
    /// Builds a page from words in any order.
    ///
    /// A word joins the current line when its vertical centre falls within
    /// the line's vertical span; otherwise it opens a new line.
    pub fn build_page(&self, mut words: Vec<Word>, dimensions: (u32, u32)) -> Page {
        words.sort_by(|a, b| a.y_center().total_cmp(&b.y_center()));

        let mut lines: Vec<Line> = Vec::new();
        for word in words {
            let joins = lines.last().is_some_and(|line| {
                let (lo, hi) = line.y_span();
                (lo..=hi).contains(&word.y_center())
            });
            match lines.last_mut() {
                Some(line) if joins => line.words.push(word),
                _ => lines.push(Line { words: vec![word] }),
            }
        }
        for line in &mut lines {
            line.words.sort_by(|a, b| a.geometry.0.0.total_cmp(&b.geometry.0.0));
        }

        let mut blocks: Vec<Block> = Vec::new();
        let mut previous_bottom = None;
        for line in lines {
            let (top, bottom) = line.y_span();
            match (blocks.last_mut(), previous_bottom) {
                (Some(block), Some(prev)) if top - prev <= self.paragraph_break => {
                    block.lines.push(line)
                }
                _ => blocks.push(Block { lines: vec![line] }),
            }
            previous_bottom = Some(bottom);
        }

        Page { dimensions, blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: &str, bbox: [f32; 4]) -> Word {
        Word::new(value, 0.9, bbox)
    }

    #[test]
    fn test_words_are_grouped_into_lines_left_to_right() {
        let page = DocumentBuilder::default().build_page(
            vec![
                word("world", [0.5, 0.10, 0.7, 0.14]),
                word("second", [0.1, 0.16, 0.3, 0.20]),
                word("hello", [0.1, 0.11, 0.3, 0.15]),
            ],
            (100, 100),
        );

        let lines: Vec<Vec<&str>> = page
            .blocks
            .iter()
            .flat_map(|b| &b.lines)
            .map(|l| l.words.iter().map(|w| w.value.as_str()).collect())
            .collect();
        assert_eq!(lines, vec![vec!["hello", "world"], vec!["second"]]);
    }

    #[test]
    fn test_large_vertical_gap_starts_new_block() {
        let page = DocumentBuilder::default().build_page(
            vec![
                word("title", [0.1, 0.05, 0.4, 0.08]),
                word("body", [0.1, 0.30, 0.4, 0.33]),
            ],
            (100, 100),
        );
        assert_eq!(page.blocks.len(), 2);
    }

    #[test]
    fn test_flatten_words_follows_traversal_order() {
        let builder = DocumentBuilder::default();
        let doc = Document {
            pages: vec![
                builder.build_page(
                    vec![word("b", [0.5, 0.1, 0.6, 0.2]), word("a", [0.1, 0.1, 0.2, 0.2])],
                    (10, 10),
                ),
                builder.build_page(vec![word("c", [0.1, 0.1, 0.2, 0.2])], (10, 10)),
            ],
        };
        let values: Vec<&str> = doc
            .flatten_words()
            .into_iter()
            .map(|w| w.value.as_str())
            .collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_page_has_no_blocks() {
        let page = DocumentBuilder::default().build_page(Vec::new(), (20, 30));
        assert!(page.blocks.is_empty());
        assert_eq!(page.dimensions, (20, 30));
    }
}
