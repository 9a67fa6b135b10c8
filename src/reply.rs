//! Chat reply rendering
//!
//! Plain-text replies in the bot's Indonesian voice. Markup uses the
//! `*bold*` convention of chat clients.

use crate::models::{AccountBalance, ParsedTransaction, Recap, TransactionType};
use std::fmt::Write;

/// Sample messages shown by `/demo` and `/help`
pub const DEMO_MESSAGES: &[&str] = &[
    "Beli nasi gudeg 35rb",
    "Isi bensin pertamax 100ribu",
    "Gaji freelance masuk 2.5jt di BCA",
    "Transfer ke BCA 100rb",
];

/// Indonesian thousands grouping: `35000` → `Rp 35.000`
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

fn rupiah(amount: u64) -> String {
    format_rupiah(i64::try_from(amount).unwrap_or(i64::MAX))
}

pub fn emoji(category: &str, tx_type: TransactionType) -> &'static str {
    match tx_type {
        TransactionType::Income => return "💰",
        TransactionType::Transfer => return "🔄",
        TransactionType::Expense => {}
    }

    match category {
        "makan" => "🍽️",
        "transport" => "🚗",
        "belanja" => "🛍️",
        "tagihan" => "📋",
        "kesehatan" => "🏥",
        "hiburan" => "🎬",
        "sedekah" => "🤲",
        _ => "💸",
    }
}

fn type_line(tx_type: TransactionType) -> &'static str {
    match tx_type {
        TransactionType::Expense => "💸 Pengeluaran",
        TransactionType::Income => "💰 Pemasukan",
        TransactionType::Transfer => "🔄 Transfer",
    }
}

/// Receipt after a transaction was booked
pub fn receipt(parsed: &ParsedTransaction, touched: &[AccountBalance]) -> String {
    let mut reply = format!("📋 *Tercatat!* {}\n", emoji(&parsed.category, parsed.tx_type));
    let _ = writeln!(reply, "💰 {},-", rupiah(parsed.amount.unwrap_or(0)));
    let _ = writeln!(reply, "📝 {}", parsed.display_note());
    let _ = write!(reply, "🏷️ {}", parsed.category);
    if !parsed.subcategory.is_empty() && parsed.subcategory != "umum" {
        let _ = write!(reply, " > {}", parsed.subcategory);
    }
    let _ = write!(reply, "\n{}", type_line(parsed.tx_type));

    for balance in touched {
        let _ = write!(reply, "\n💳 {}: {},-", balance.account, format_rupiah(balance.balance));
    }

    reply
}

/// Prompt sent when the reading is not trusted enough to book directly
pub fn confirmation(parsed: &ParsedTransaction) -> String {
    let mut reply = String::from("🤔 *Konfirmasi Transaksi*\n\n");
    let _ = writeln!(reply, "Jenis: {}", parsed.tx_type.label());
    let _ = writeln!(reply, "💰 Nominal: {}", rupiah(parsed.amount.unwrap_or(0)));
    let _ = writeln!(reply, "🏷️ Kategori: {}", parsed.category);
    let _ = writeln!(reply, "💳 Sumber: {}", parsed.source_account);
    if let Some(target) = &parsed.target_account {
        let _ = writeln!(reply, "➡️ Tujuan: {}", target);
    }
    let _ = writeln!(reply, "📝 Keterangan: {}", parsed.display_note());
    let _ = writeln!(reply, "📊 Confidence: {}%\n", parsed.confidence);
    reply.push_str("Balas *\"ya\"* untuk simpan atau koreksi yang salah");
    reply
}

pub fn balances(balances: &[AccountBalance]) -> String {
    let mut reply = String::from("💳 *Saldo Rekening:*\n\n");
    let mut total: i64 = 0;

    for balance in balances {
        let _ = writeln!(reply, "• {}: {}", balance.account, format_rupiah(balance.balance));
        total = total.saturating_add(balance.balance);
    }

    let _ = write!(reply, "\n💰 *Total: {}*", format_rupiah(total));
    reply
}

pub fn recap(recap: &Recap) -> String {
    let scope = recap
        .type_filter
        .map(|ty| ty.label().to_uppercase())
        .unwrap_or_else(|| "SEMUA JENIS".to_string());

    if recap.rows.is_empty() {
        return format!("📅 Tidak ada data untuk {} ({})", recap.period, scope);
    }

    let mut reply = format!("📊 *Rekap {}* ({})\n\n", recap.period, scope);
    for row in &recap.rows {
        let _ = writeln!(
            reply,
            "• {} {} {} - {} ({})",
            row.recorded_at.format("%d/%m/%Y"),
            emoji(&row.category, row.tx_type),
            rupiah(row.amount),
            row.note,
            row.source_account
        );
    }

    let _ = write!(
        reply,
        "\n💰 Pemasukan: {}\n💸 Pengeluaran: {}\n🔄 Transfer: {}",
        rupiah(recap.total_income),
        rupiah(recap.total_expense),
        rupiah(recap.total_transfer)
    );
    reply
}

pub fn help() -> String {
    let mut reply = String::from("🤖 *Bot Keuangan Natural*\n\n*📱 Cara Pakai:*\n");
    reply.push_str("Cukup ketik transaksi secara natural, bot akan otomatis mengenali dan menyimpan:\n");
    for sample in DEMO_MESSAGES.iter().take(2) {
        let _ = writeln!(reply, "• Contoh: \"{}\"", sample);
    }
    reply.push_str(
        "\n*🔧 Command yang tersedia:*\n\
         • /saldo ➜ Cek semua saldo rekening\n\
         • /rekap [periode] [jenis] ➜ Rekap transaksi (periode YYYY-MM atau YYYY)\n\
         • /demo ➜ Contoh pesan yang dikenali\n\
         • /help ➜ Tampilkan bantuan ini",
    );
    reply
}

/// `/demo`: each sample with the reading the classifier produced
pub fn demo(readings: &[ParsedTransaction]) -> String {
    let mut reply = String::from("🎮 *Demo NLP Parser:*\n");
    for parsed in readings {
        let _ = write!(
            reply,
            "\n• \"{}\"\n  {} {} | {} | {} | {}",
            parsed.raw_text,
            emoji(&parsed.category, parsed.tx_type),
            parsed.tx_type.label(),
            parsed.amount.map(rupiah).unwrap_or_else(|| "-".to_string()),
            parsed.category,
            parsed.source_account
        );
        if let Some(target) = &parsed.target_account {
            let _ = write!(reply, " ➜ {}", target);
        }
    }
    reply
}

pub fn unknown_command() -> String {
    "❓ Command tidak dikenal. Ketik */help* untuk bantuan.".to_string()
}

pub fn invalid_period(period: &str) -> String {
    format!("❌ Periode '{}' tidak valid. Gunakan format YYYY-MM atau YYYY.", period)
}

pub fn invalid_type_filter(value: &str) -> String {
    format!(
        "❌ Jenis '{}' tidak dikenal. Gunakan pengeluaran, pemasukan atau transfer.",
        value
    )
}

pub fn storage_failure(parsed: &ParsedTransaction) -> String {
    let mut reply = String::from("❌ *Gagal menyimpan transaksi*\n\n");
    let _ = writeln!(reply, "• Jenis: {}", parsed.tx_type.label());
    let _ = writeln!(reply, "• Nominal: {}", rupiah(parsed.amount.unwrap_or(0)));
    let _ = writeln!(reply, "• Kategori: {}", parsed.category);
    let _ = writeln!(reply, "• Sumber: {}", parsed.source_account);
    let _ = write!(reply, "• Keterangan: {}", parsed.display_note());
    reply
}
