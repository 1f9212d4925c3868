use std::{fmt, str::FromStr};

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use derive_more::{Deref, Display, From};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::domain::{DataAccessError, Entity};

/// 顧客リポジトリ
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 顧客を全件取得する
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError>;
    /// 顧客をIDで検索する
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError>;
    /// 顧客を登録する
    async fn create(&self, fields: CustomerFields) -> Result<Customer, DataAccessError>;
    /// 指定された項目だけを更新し、更新後の顧客を返す
    async fn update_by_id(
        &self,
        id: CustomerId,
        fields: CustomerFields,
    ) -> Result<Option<Customer>, DataAccessError>;
    /// 顧客を削除し、削除前の顧客を返す
    async fn delete_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError>;
}

/// 顧客ID
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    From,
    Deref,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct CustomerId(ObjectId);

impl CustomerId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }
}

impl FromStr for CustomerId {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| CustomerError::InvalidId(s.to_owned()))
    }
}

/// 生年月日
///
/// `YYYY-MM-DD` で入出力する。入力はRFC 3339形式の日時も受け付ける。
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    From,
    Deref,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub fn midnight_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&NaiveDateTime::new(self.0, NaiveTime::default()))
    }
}

impl From<DateTime<Utc>> for BirthDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.date_naive())
    }
}

impl FromStr for BirthDate {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| {
                DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc).date_naive())
            })
            .map(Self)
            .map_err(|_| CustomerError::InvalidBirthDate(s.to_owned()))
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// 会員番号
///
/// 文字列として保持する。数値で渡された場合は文字列に変換する。
#[derive(Clone, Debug, PartialEq, Eq, Display, From, Serialize)]
#[serde(transparent)]
pub struct MemberNo(String);

impl MemberNo {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberNo {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// f64で誤差なく表せる整数の上限
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

impl<'de> Deserialize<'de> for MemberNo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MemberNoVisitor)
    }
}

struct MemberNoVisitor;

impl<'de> de::Visitor<'de> for MemberNoVisitor {
    type Value = MemberNo;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a text member number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(MemberNo(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(MemberNo(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(MemberNo(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(MemberNo(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_FLOAT {
            Ok(MemberNo((value as i64).to_string()))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }
}

/// 顧客の入力項目
///
/// 登録時は全項目が必須、更新時は指定された項目だけが反映される。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<BirthDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memberno: Option<MemberNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
}

impl CustomerFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dob.is_none()
            && self.memberno.is_none()
            && self.interest.is_none()
    }

    /// 指定された項目が空欄でないことを検証する
    pub fn validate(&self) -> Result<(), CustomerError> {
        validate_not_blank("name", self.name.as_deref())?;
        validate_not_blank("memberno", self.memberno.as_ref().map(MemberNo::as_str))?;
        validate_not_blank("interest", self.interest.as_deref())
    }
}

fn validate_not_blank(field: &'static str, value: Option<&str>) -> Result<(), CustomerError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(CustomerError::BlankField(field)),
        _ => Ok(()),
    }
}

/// 登録用の検証済み項目
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub dob: BirthDate,
    pub memberno: MemberNo,
    pub interest: String,
}

impl TryFrom<CustomerFields> for NewCustomer {
    type Error = CustomerError;

    fn try_from(fields: CustomerFields) -> Result<Self, Self::Error> {
        fields.validate()?;
        Ok(Self {
            name: fields.name.ok_or(CustomerError::MissingField("name"))?,
            dob: fields.dob.ok_or(CustomerError::MissingField("dob"))?,
            memberno: fields
                .memberno
                .ok_or(CustomerError::MissingField("memberno"))?,
            interest: fields
                .interest
                .ok_or(CustomerError::MissingField("interest"))?,
        })
    }
}

/// 顧客エンティティ
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    id: CustomerId,
    name: String,
    dob: BirthDate,
    memberno: MemberNo,
    interest: String,
}

impl Customer {
    pub fn new(id: CustomerId, fields: NewCustomer) -> Self {
        Self {
            id,
            name: fields.name,
            dob: fields.dob,
            memberno: fields.memberno,
            interest: fields.interest,
        }
    }

    pub fn create(id: CustomerId, fields: CustomerFields) -> Result<Self, CustomerError> {
        Ok(Self::new(id, NewCustomer::try_from(fields)?))
    }

    /// 変更を適用する。検証に失敗した場合は何も変更しない。
    pub fn apply(&mut self, changes: CustomerFields) -> Result<(), CustomerError> {
        changes.validate()?;
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(dob) = changes.dob {
            self.dob = dob;
        }
        if let Some(memberno) = changes.memberno {
            self.memberno = memberno;
        }
        if let Some(interest) = changes.interest {
            self.interest = interest;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dob(&self) -> BirthDate {
        self.dob
    }

    pub fn memberno(&self) -> &MemberNo {
        &self.memberno
    }

    pub fn interest(&self) -> &str {
        &self.interest
    }

    /// ID以外の項目
    pub fn fields(&self) -> CustomerFields {
        CustomerFields {
            name: Some(self.name.clone()),
            dob: Some(self.dob),
            memberno: Some(self.memberno.clone()),
            interest: Some(self.interest.clone()),
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    const ENTITY_NAME: &'static str = "customer";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// 顧客エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} cannot be blank")]
    BlankField(&'static str),
    #[error("Invalid customer id: {0}")]
    InvalidId(String),
    #[error("Invalid date of birth: {0}")]
    InvalidBirthDate(String),
}
