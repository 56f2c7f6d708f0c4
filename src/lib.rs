pub mod audio;
pub mod corpus;
pub mod freq;
pub mod io;
pub mod models;
pub mod tokenize;

pub use audio::{
    BatchOutcome, extract_audio_batch, extract_video_batch, format_hms, scan_wav_lengths,
};
pub use corpus::{InputKind, RunConfig, RunOutcome, execute_run, resolve_output_dir};
pub use freq::{
    FrequencyTable, TaggedToken, collect_class_lines, count_content_words, count_lemmas_by_class,
    count_word_classes,
};
pub use io::{EafDocument, EafError, RunReport, parse_eaf_file, parse_eaf_str, write_frequency_tsv};
pub use models::{
    ADULT_TIERS, AnnotationRecord, CHILD_TIERS, RunSummary, SpeakerInventory, TierClass,
};
pub use tokenize::{Token, TokenKind, Tokenizer, WordTokenizer};
