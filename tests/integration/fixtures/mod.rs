// Test fixtures with known dictionaries, corpora and expected outputs
// WHY: Golden-file testing requires deterministic input/output pairs for validation

/// Dictionary with mixed categories, scores written both as ints and floats,
/// and a repeated phrase whose last row carries the live info
pub const SLANG_CSV: &str = "slang,canonical_form,type,toxic_score
ragebait,rage bait,negative,4
goated,greatest of all time,positive,1
fuckton,a lot,neutral,2.0
simp,,negative,2
mid,mediocre,neutral,3
son of a bitch,,negative,5
ragebait,rage baiting,negative,5
";

/// Corpus in the shape of a scraped comment dump
pub const CORPUS_CSV: &str = r#"id,Body,score
1,"Bruh this is sooo mid, bruh",10
2,No cap that was goated,4
3,"bruh moment, no cap",7
4,the 2024 season,1
"#;

/// Reference vocabulary for mining and normalization
pub const BASE_WORDS: &[&str] = &[
    "this", "is", "no", "cap", "that", "was", "moment", "the", "season", "so", "mid",
];

/// Expected `mine` output for CORPUS_CSV / BASE_WORDS at min_freq 1
pub const MINED_EXPECTED: &str = "slang,frequency,canonical_form
bruh,3,bruh
goated,1,goated
sooo,1,soo
";

/// Labelled cases in the JSON format accepted by `evaluate --cases`
pub const CASES_JSON: &str = r#"[
  {"sentence": "Stop posting ragebait", "expected_toxic": true, "expected_count": 1},
  {"sentence": "That was goated", "expected_toxic": false, "expected_count": 0},
  {"sentence": "what a simp", "expected_toxic": true, "expected_count": 1},
  {"sentence": "sh1t happens", "expected_toxic": true, "expected_count": 1},
  {"sentence": "have a nice day", "expected_toxic": true, "expected_count": 1}
]"#;
