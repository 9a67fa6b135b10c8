//! Integration tests for the transaction classifier
//!
//! These pin down the observable behavior of `classify` on the built-in
//! Indonesian lexicon.

use catat_keuangan::{
    classifier::MAX_CONFIDENCE, LexiconConfig, TransactionClassifier, TransactionType,
    DEFAULT_ACCOUNT, OTHER_CATEGORY,
};

fn classifier() -> TransactionClassifier {
    TransactionClassifier::new(LexiconConfig::indonesian()).expect("built-in lexicon compiles")
}

/// Inputs that exercise odd corners: empty, whitespace, emoji, other
/// languages, huge numbers, punctuation-only
fn odd_inputs() -> Vec<String> {
    vec![
        String::new(),
        "   ".to_string(),
        "\t\n".to_string(),
        "🍜🍜🍜".to_string(),
        "bought coffee for five dollars".to_string(),
        "収入 3000".to_string(),
        "9".repeat(200),
        "..,,..".to_string(),
        "ke dari ke dari".to_string(),
        "transfer ke ke ke".to_string(),
        "Rp 1.000.000.000.000.000.000.000".to_string(),
        "2,5 juta dari BCA ke BCA".to_string(),
    ]
}

// =============================================================================
// Totality & bounds
// =============================================================================

#[test]
fn test_any_input_yields_well_formed_reading() {
    let classifier = classifier();

    for input in odd_inputs() {
        let parsed = classifier.classify(&input);

        assert!(parsed.confidence <= MAX_CONFIDENCE, "input: {:?}", input);
        assert_eq!(parsed.raw_text, input);
        assert!(!parsed.source_account.is_empty());
        if parsed.tx_type != TransactionType::Transfer {
            assert_eq!(parsed.target_account, None, "input: {:?}", input);
        }
        if let Some(target) = &parsed.target_account {
            assert_ne!(target, &parsed.source_account, "input: {:?}", input);
        }
        assert_ne!(parsed.amount, Some(0));
    }
}

#[test]
fn test_empty_string_defaults() {
    let parsed = classifier().classify("");

    assert_eq!(parsed.tx_type, TransactionType::Expense);
    assert_eq!(parsed.amount, None);
    assert_eq!(parsed.category, OTHER_CATEGORY);
    assert!(parsed.subcategory.is_empty());
    assert_eq!(parsed.source_account, DEFAULT_ACCOUNT);
    assert_eq!(parsed.confidence, 0);
}

#[test]
fn test_zero_confidence_exactly_without_evidence() {
    let classifier = classifier();
    let samples = [
        "",
        "halo apa kabar",
        "gaji",
        "ngopi sore",
        "pakai bca",
        "20",
        "Beli nasi gudeg 35rb",
        "pake cash",
    ];

    for sample in samples {
        let parsed = classifier.classify(sample);
        let no_evidence = parsed.amount.is_none()
            && parsed.category == OTHER_CATEGORY
            && parsed.source_account == DEFAULT_ACCOUNT;
        assert_eq!(parsed.confidence == 0, no_evidence, "sample: {}", sample);
    }
}

#[test]
fn test_readings_are_deterministic() {
    let first = classifier().classify("Transfer dari BRI ke DANA 250rb buat jajan");
    let second = classifier().classify("Transfer dari BRI ke DANA 250rb buat jajan");
    assert_eq!(first, second);
}

// =============================================================================
// Amounts
// =============================================================================

#[test]
fn test_amount_scales_with_suffix() {
    let classifier = classifier();
    assert_eq!(classifier.classify("beli barang 20").amount, Some(20));
    assert_eq!(classifier.classify("beli barang 20rb").amount, Some(20_000));
    assert_eq!(classifier.classify("beli barang 20jt").amount, Some(20_000_000));
}

#[test]
fn test_largest_candidate_is_the_amount() {
    assert_eq!(
        classifier().classify("beli 2 barang seharga 50000").amount,
        Some(50_000)
    );
}

#[test]
fn test_uppercase_suffix() {
    assert_eq!(classifier().classify("Isi bensin pertamax 100RIBU").amount, Some(100_000));
}

// =============================================================================
// Transfers & accounts
// =============================================================================

#[test]
fn test_transfer_needs_direction() {
    let classifier = classifier();

    let parsed = classifier.classify("transfer ke BCA 100rb");
    assert_eq!(parsed.tx_type, TransactionType::Transfer);
    assert_eq!(parsed.source_account, DEFAULT_ACCOUNT);
    assert_eq!(parsed.target_account.as_deref(), Some("BCA"));
    assert_eq!(parsed.amount, Some(100_000));

    let parsed = classifier.classify("transfer dong");
    assert_eq!(parsed.tx_type, TransactionType::Expense);
    assert_eq!(parsed.target_account, None);
}

#[test]
fn test_first_alias_is_source() {
    let parsed = classifier().classify("bayar pakai bca 50rb dari bri");
    assert_eq!(parsed.source_account, "BCA");
    assert_eq!(parsed.amount, Some(50_000));
}

#[test]
fn test_transfer_source_ignores_dari_order() {
    let classifier = classifier();

    let parsed = classifier.classify("tarik tunai dari bri 500rb");
    assert_eq!(parsed.tx_type, TransactionType::Transfer);
    assert_eq!(parsed.source_account, DEFAULT_ACCOUNT);
    assert_eq!(parsed.target_account.as_deref(), Some("BRI"));

    let parsed = classifier.classify("kirim dana dari bca ke ovo 50rb");
    assert_eq!(parsed.source_account, "DANA");
    assert_eq!(parsed.target_account.as_deref(), Some("BCA"));
}

#[test]
fn test_transfer_between_banks() {
    let parsed = classifier().classify("pindah 1,5jt dari BRI ke Mandiri");
    assert_eq!(parsed.tx_type, TransactionType::Transfer);
    assert_eq!(parsed.source_account, "BRI");
    assert_eq!(parsed.target_account.as_deref(), Some("MANDIRI"));
    assert_eq!(parsed.amount, Some(1_500_000));
    assert_eq!(parsed.normalized_description, "pindah");
}

// =============================================================================
// Category & description
// =============================================================================

#[test]
fn test_category_uses_substrings() {
    let parsed = classifier().classify("ngopi sore");
    assert_eq!(parsed.category, "makan");
    assert!(parsed.subcategory.is_empty());
}

#[test]
fn test_normalization_is_idempotent() {
    let classifier = classifier();
    let samples = [
        "Beli nasi gudeg 35rb",
        "Gaji masuk 2jt di BCA",
        "bayar listrik 150.000 pake OVO dan gopay",
        "kirim 20 k ke Dana untuk adik",
        "Beli pulsa Rp20.000",
        "35rb",
        "🍜 makan 25rb di warteg",
    ];

    for sample in samples {
        let once = classifier.classify(sample).normalized_description;
        assert_eq!(classifier.normalize_description(&once), once, "sample: {}", sample);
    }
}

#[test]
fn test_currency_prefixed_amount_is_stripped() {
    let parsed = classifier().classify("Beli pulsa Rp20.000");
    assert_eq!(parsed.amount, Some(20_000));
    assert_eq!(parsed.normalized_description, "Beli pulsa Rp");
}

#[test]
fn test_bare_amount_normalizes_to_empty() {
    let parsed = classifier().classify("35rb");
    assert_eq!(parsed.normalized_description, "");
    assert_eq!(parsed.display_note(), "35rb");
}
