use std::collections::HashMap;
use std::io::BufRead;

use anyhow::{Context, Result};

/// One line of a PoS-tagged, lemmatized file: surface form, tag, lemma
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub form: String,
    pub tag: String,
    pub lemma: String,
}

impl TaggedToken {
    /// Parse a whitespace-separated `form tag lemma` line.
    ///
    /// Lines with fewer than three fields (blank lines, bare boundary
    /// markers) yield `None` and are skipped by the counters.
    pub fn parse(line: &str) -> Option<TaggedToken> {
        let mut fields = line.split_whitespace();
        let form = fields.next()?;
        let tag = fields.next()?;
        let lemma = fields.next()?;
        Some(TaggedToken {
            form: form.to_string(),
            tag: tag.to_string(),
            lemma: lemma.to_string(),
        })
    }

    /// First character of the tag: the word-class code of the IFD tagset
    pub fn word_class(&self) -> Option<char> {
        self.tag.chars().next()
    }

    /// Whether the surface form is pure ASCII punctuation
    pub fn is_punctuation(&self) -> bool {
        !self.form.is_empty() && self.form.chars().all(|c| c.is_ascii_punctuation())
    }
}

/// Frequency table with a deterministic emit order
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn add(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries descending by count; equal counts order lexically by key,
    /// so repeated runs emit identical tables.
    pub fn into_sorted(self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self.counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// Count lemmas of one word class in a tagged file.
///
/// A line contributes iff its form is not pure punctuation and its tag
/// starts with `class` (`s` selects verbs in the IFD tagset).
pub fn count_lemmas_by_class(reader: impl BufRead, class: char) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::default();
    for line in reader.lines() {
        let line = line.context("Failed to read tagged file")?;
        let Some(token) = TaggedToken::parse(&line) else {
            continue;
        };
        if token.is_punctuation() {
            continue;
        }
        if token.word_class() == Some(class) {
            table.add(&token.lemma);
        }
    }
    Ok(table)
}

/// Count word-class codes (tag first characters) in a tab-separated
/// tagged file
pub fn count_word_classes(reader: impl BufRead) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::default();
    for line in reader.lines() {
        let line = line.context("Failed to read tagged file")?;
        if let Some(class) = tab_field_class(&line) {
            table.add(&class.to_string());
        }
    }
    Ok(table)
}

/// Collect the lines of one word class, for inspection on the console
pub fn collect_class_lines(reader: impl BufRead, class: char) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read tagged file")?;
        if tab_field_class(&line) == Some(class) {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn tab_field_class(line: &str) -> Option<char> {
    let mut fields = line.split('\t');
    let _form = fields.next()?;
    fields.next()?.chars().next()
}

/// Count token lines in a tagged file, excluding blank lines and lines
/// opening with a punctuation character
pub fn count_content_words(reader: impl BufRead) -> Result<usize> {
    let mut count = 0;
    for line in reader.lines() {
        let line = line.context("Failed to read tagged file")?;
        if line.trim().is_empty() {
            continue;
        }
        if line.chars().next().is_some_and(|c| c.is_ascii_punctuation()) {
            continue;
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_tagged_line() {
        let token = TaggedToken::parse("hundur\tnkeo\thundur").unwrap();
        assert_eq!(token.form, "hundur");
        assert_eq!(token.tag, "nkeo");
        assert_eq!(token.lemma, "hundur");
        assert_eq!(token.word_class(), Some('n'));
    }

    #[test]
    fn test_parse_short_line_is_none() {
        assert!(TaggedToken::parse("").is_none());
        assert!(TaggedToken::parse("hundur\tnkeo").is_none());
    }

    #[test]
    fn test_lemma_counter_class_filter() {
        let input = "hundur\tnkeo\thundur\n\
                     er\tsfg3en\tvera\n\
                     var\tsfg3eþ\tvera\n\
                     fór\tsfg3eþ\tfara\n\
                     .\t.\t.\n";
        let table = count_lemmas_by_class(Cursor::new(input), 's').unwrap();
        let sorted = table.into_sorted();

        // the noun line and the punctuation line are excluded
        assert_eq!(sorted, vec![("vera".to_string(), 2), ("fara".to_string(), 1)]);
    }

    #[test]
    fn test_lemma_counter_excludes_other_classes() {
        let input = "hundur\tnkeo\thundur\n";
        let table = count_lemmas_by_class(Cursor::new(input), 's').unwrap();
        assert!(table.is_empty());

        let table = count_lemmas_by_class(Cursor::new(input), 'n').unwrap();
        assert_eq!(table.into_sorted(), vec![("hundur".to_string(), 1)]);
    }

    #[test]
    fn test_sorted_tie_break_is_lexical() {
        let mut table = FrequencyTable::default();
        table.add("fara");
        table.add("koma");
        table.add("vera");
        table.add("vera");

        let sorted = table.into_sorted();
        assert_eq!(
            sorted,
            vec![
                ("vera".to_string(), 2),
                ("fara".to_string(), 1),
                ("koma".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_word_class_counter() {
        let input = "hundur\tnkeo\thundur\n\
                     er\tsfg3en\tvera\n\
                     stór\tlkensf\tstór\n\
                     köttur\tnken\tköttur\n";
        let table = count_word_classes(Cursor::new(input)).unwrap();
        let sorted = table.into_sorted();

        assert_eq!(
            sorted,
            vec![
                ("n".to_string(), 2),
                ("l".to_string(), 1),
                ("s".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_collect_class_lines() {
        let input = "stór\tlkensf\tstór\nhundur\tnkeo\thundur\n";
        let lines = collect_class_lines(Cursor::new(input), 'l').unwrap();
        assert_eq!(lines, vec!["stór\tlkensf\tstór"]);
    }

    #[test]
    fn test_content_word_count() {
        let input = "hundur\tnkeo\thundur\n\
                     .\t.\t.\n\
                     \n\
                     er\tsfg3en\tvera\n\
                     ,\t,\t,\n";
        let count = count_content_words(Cursor::new(input)).unwrap();
        assert_eq!(count, 2);
    }
}
