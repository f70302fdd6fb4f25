pub mod glyphs;
pub mod outline_annotator;
