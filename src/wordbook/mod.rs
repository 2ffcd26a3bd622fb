mod import;

pub use import::{
    import_file, import_items, import_str, parse_wordbook, ImportError, ImportStats,
    ParsedWordbook, WordbookItem,
};
