#![allow(dead_code)]

use std::fs;
use std::path::Path;

use bible_alignments::AlignmentSet;

pub const SOURCE_HEADER: &[&str] = &["id", "altId", "text", "strongs", "gloss", "gloss2", "lemma", "pos", "morph"];

pub const TARGET_HEADER: &[&str] = &[
    "id",
    "altId",
    "text",
    "source_verse",
    "skip_space_after",
    "exclude",
    "transType",
    "isPunc",
    "isPrimary",
    "msId",
];

/// Mark 4:3 with six source words, plus the first word of 4:4 which no
/// record aligns.
pub const SOURCE_ROWS: &[&[&str]] = &[
    &["n41004003001", "ακουετε-1", "ακουετε", "G0191", "Listen", "", "ακουω", "verb", "V-PAM-2P"],
    &["n41004003002", "ιδου-1", "ιδου", "G2400", "behold", "", "ιδου", "ptcl", "I"],
    &["n41004003003", "εξηλθεν-1", "εξηλθεν", "G1831", "went out", "", "εξερχομαι", "verb", "V-2AAI-3S"],
    &["n41004003004", "ο-1", "ο", "G3588", "the", "", "ο", "det", "T-NSM"],
    &["n41004003005", "σπειρων-1", "σπειρων", "G4687", "sowing", "", "σπειρω", "verb", "V-PAP-NSM"],
    &["n41004003006", "σπειραι-1", "σπειραι", "G4687", "to sow", "", "σπειρω", "verb", "V-AAN"],
    &["n41004004001", "και-1", "και", "G2532", "and", "", "και", "cj", "C"],
];

pub const TARGET_ROWS: &[&[&str]] = &[
    &["41004003001", "Listen-1", "Listen", "", "y", "", "", "", "", ""],
    &["41004003002", "!-1", "!", "", "", "", "", "y", "", ""],
    &["41004003003", "A-1", "A", "", "", "", "", "", "", ""],
    &["41004003004", "farmer-1", "farmer", "", "", "", "", "", "y", ""],
    &["41004003005", "went-1", "went", "", "", "", "", "", "", ""],
    &["41004003006", "out-1", "out", "", "", "", "", "", "", ""],
    &["41004003007", "to-1", "to", "", "", "", "", "", "", ""],
    &["41004003008", "sow-1", "sow", "", "", "", "", "", "", ""],
    &["41004004001", "And-1", "And", "", "", "", "", "", "", ""],
];

/// Two valid records and one that points at a target token which does not
/// exist.
pub const ALIGNMENTS: &str = r#"{
  "meta": {"creator": "GrapeCity", "conformsTo": "0.3"},
  "type": "translation",
  "records": [
    {"meta": {"id": "41004003.001", "origin": "manual"},
     "source": ["n41004003001"], "target": ["41004003001"]},
    {"meta": {"id": "41004003.002", "origin": "manual"},
     "source": ["n41004003005", "n41004003004"], "target": ["41004003004", "41004003003"]},
    {"meta": {"id": "41004003.003", "process": "manual"},
     "source": ["n41004003003"], "target": ["41004003005", "41004003099"]}
  ]
}"#;

pub fn tsv(header: &[&str], rows: &[&[&str]]) -> String {
    let mut out = header.join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Lays out a complete SBLGNT-BSB-manual set under `root`.
pub fn write_alignment_set(root: &Path) -> AlignmentSet {
    write_alignment_set_with(root, ALIGNMENTS)
}

pub fn write_alignment_set_with(root: &Path, alignments: &str) -> AlignmentSet {
    let set = AlignmentSet::new("SBLGNT", "BSB", "eng", root.join("sources"), root.join("eng")).unwrap();
    write(&set.source_path(), &tsv(SOURCE_HEADER, SOURCE_ROWS));
    write(&set.target_path(), &tsv(TARGET_HEADER, TARGET_ROWS));
    write(&set.alignment_path(), alignments);
    write(&set.toml_path(), "[meta]\ncreator = \"GrapeCity\"\n");
    set
}
