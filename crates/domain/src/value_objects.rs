//! # 共通値オブジェクト
//!
//! 複数のエンティティから使用される値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Amount`] | 金額 | 集金・寄付の金額（NUMERIC(10,2) 相当） |
//! | [`MonthKey`] | 対象月 | `YYYY-MM` 形式の月指定と月次集計範囲 |

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::DomainError;

/// NUMERIC(10,2) で表現できる最大値
const MAX_AMOUNT: f64 = 99_999_999.99;

/// 金額（値オブジェクト）
///
/// 集金・寄付の金額を表現する。
/// データベースの NUMERIC(10,2) カラムに保存可能な範囲のみ受け入れる。
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
   /// 金額を作成する
   ///
   /// # バリデーション
   ///
   /// - 有限値であること（NaN / 無限大を拒否）
   /// - 0 より大きいこと
   /// - NUMERIC(10,2) の上限以下であること
   pub fn new(value: f64) -> Result<Self, DomainError> {
      if !value.is_finite() {
         return Err(DomainError::Validation(
            "金額は有限の数値である必要があります".to_string(),
         ));
      }

      if value <= 0.0 {
         return Err(DomainError::Validation(
            "金額は0より大きい必要があります".to_string(),
         ));
      }

      if value > MAX_AMOUNT {
         return Err(DomainError::Validation(
            "金額が上限を超えています".to_string(),
         ));
      }

      Ok(Self(value))
   }

   /// 内部の数値を取得する
   pub fn value(&self) -> f64 {
      self.0
   }
}

/// 対象月（値オブジェクト）
///
/// `YYYY-MM` 形式の月指定を表現し、月次集計の半開区間
/// `[月初, 翌月初)` を導出する。
///
/// # 不変条件
///
/// - 月は 1〜12 の範囲
/// - 12月の翌月は翌年の1月（年またぎ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
   year:  i32,
   month: u32,
}

impl MonthKey {
   /// 年と月から対象月を作成する
   pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
      if !(1..=12).contains(&month) {
         return Err(DomainError::Validation(format!(
            "不正な月指定です: {}-{}",
            year, month
         )));
      }

      Ok(Self { year, month })
   }

   /// 指定時刻が属する月を返す
   pub fn containing(now: DateTime<Utc>) -> Self {
      Self {
         year:  now.year(),
         month: now.month(),
      }
   }

   /// 月次集計の半開区間 `[月初, 翌月初)` を UTC で返す
   pub fn range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
      let start = Self::month_start(self.year, self.month);

      let (next_year, next_month) = if self.month == 12 {
         (self.year + 1, 1)
      } else {
         (self.year, self.month + 1)
      };
      let end = Self::month_start(next_year, next_month);

      (start, end)
   }

   fn month_start(year: i32, month: u32) -> DateTime<Utc> {
      // new() で月の範囲を検証済みのため、月初の日付は常に存在する
      NaiveDate::from_ymd_opt(year, month, 1)
         .and_then(|d| d.and_hms_opt(0, 0, 0))
         .map(|dt| dt.and_utc())
         .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
   }
}

impl std::str::FromStr for MonthKey {
   type Err = DomainError;

   /// `YYYY-MM` 形式の文字列をパースする
   fn from_str(s: &str) -> Result<Self, Self::Err> {
      let invalid = || DomainError::Validation(format!("不正な月形式です（YYYY-MM）: {}", s));

      let (year_str, month_str) = s.split_once('-').ok_or_else(invalid)?;

      if year_str.len() != 4 || month_str.len() != 2 {
         return Err(invalid());
      }

      let year: i32 = year_str.parse().map_err(|_| invalid())?;
      let month: u32 = month_str.parse().map_err(|_| invalid())?;

      Self::new(year, month)
   }
}

impl std::fmt::Display for MonthKey {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{:04}-{:02}", self.year, self.month)
   }
}
