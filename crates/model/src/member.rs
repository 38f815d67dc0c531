use chrono::{Months, NaiveDate};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub membership_type: MembershipType,
    pub join_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: MemberStatus,
}

impl Member {
    pub fn new(form: NewMember, today: NaiveDate) -> Member {
        let expiry_date = form.membership_type.expiry_from(form.join_date);
        Member {
            id: ObjectId::new(),
            name: form.name,
            gender: form.gender,
            date_of_birth: form.date_of_birth,
            phone: sanitize_phone(&form.phone),
            email: form.email,
            address: form.address,
            membership_type: form.membership_type,
            join_date: form.join_date,
            expiry_date,
            status: MemberStatus::derive(expiry_date, today),
        }
    }

    /// Status as it stands right now, regardless of the cached field.
    pub fn effective_status(&self, today: NaiveDate) -> MemberStatus {
        MemberStatus::derive(self.expiry_date, today)
    }

    /// Expiry after a payment with the given due date: a one-directional
    /// ratchet, never earlier than the current expiry.
    pub fn extended_expiry(&self, due_date: NaiveDate) -> NaiveDate {
        self.expiry_date.max(due_date)
    }
}

/// Fields supplied on registration. Expiry and status are derived.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub membership_type: MembershipType,
    pub join_date: NaiveDate,
}

/// Fields accepted on edit. Expiry is recomputed when the membership type or
/// join date changed, otherwise the submitted value wins. Status is taken as
/// given (manual override path).
#[derive(Debug, Clone)]
pub struct MemberUpdate {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub membership_type: MembershipType,
    pub join_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: MemberStatus,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display,
)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
)]
pub enum MembershipType {
    Basic,
    Standard,
    Premium,
}

impl MembershipType {
    pub fn months(&self) -> u32 {
        match self {
            MembershipType::Basic => 1,
            MembershipType::Standard => 3,
            MembershipType::Premium => 12,
        }
    }

    /// Calendar-month addition, day clamped to the end of the target month.
    pub fn expiry_from(&self, join_date: NaiveDate) -> NaiveDate {
        join_date + Months::new(self.months())
    }
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display,
)]
pub enum MemberStatus {
    Active,
    Expired,
}

impl MemberStatus {
    pub fn derive(expiry_date: NaiveDate, today: NaiveDate) -> MemberStatus {
        if expiry_date >= today {
            MemberStatus::Active
        } else {
            MemberStatus::Expired
        }
    }
}

pub fn sanitize_phone(phone: &str) -> String {
    phone
        .chars()
        .enumerate()
        .filter_map(|(idx, c)| {
            if c.is_ascii_digit() || (idx == 0 && c == '+') {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(membership_type: MembershipType, join_date: NaiveDate) -> NewMember {
        NewMember {
            name: "John Doe".to_string(),
            gender: Gender::Male,
            date_of_birth: date(1990, 5, 20),
            phone: "+1 (234) 567-8900".to_string(),
            email: String::new(),
            address: String::new(),
            membership_type,
            join_date,
        }
    }

    #[test]
    fn test_expiry_per_membership_type() {
        let join = date(2024, 1, 1);
        assert_eq!(
            MembershipType::Basic.expiry_from(join),
            date(2024, 2, 1)
        );
        assert_eq!(
            MembershipType::Standard.expiry_from(join),
            date(2024, 4, 1)
        );
        assert_eq!(
            MembershipType::Premium.expiry_from(join),
            date(2025, 1, 1)
        );
    }

    #[test]
    fn test_expiry_clamps_to_month_end() {
        assert_eq!(
            MembershipType::Basic.expiry_from(date(2024, 1, 31)),
            date(2024, 2, 29)
        );
        assert_eq!(
            MembershipType::Basic.expiry_from(date(2023, 1, 31)),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn test_status_derivation_boundary() {
        let today = date(2024, 2, 1);
        assert_eq!(
            MemberStatus::derive(date(2024, 2, 1), today),
            MemberStatus::Active
        );
        assert_eq!(
            MemberStatus::derive(date(2024, 2, 2), today),
            MemberStatus::Active
        );
        assert_eq!(
            MemberStatus::derive(date(2024, 1, 31), today),
            MemberStatus::Expired
        );
    }

    #[test]
    fn test_new_member_derives_expiry_and_status() {
        let member = Member::new(form(MembershipType::Basic, date(2024, 1, 1)), date(2024, 1, 10));
        assert_eq!(member.expiry_date, date(2024, 2, 1));
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.phone, "+12345678900");

        let stale = Member::new(form(MembershipType::Basic, date(2023, 1, 1)), date(2024, 1, 10));
        assert_eq!(stale.status, MemberStatus::Expired);
    }

    #[test]
    fn test_extended_expiry_never_regresses() {
        let mut member = Member::new(form(MembershipType::Basic, date(2024, 1, 1)), date(2024, 1, 1));
        assert_eq!(member.expiry_date, date(2024, 2, 1));

        member.expiry_date = member.extended_expiry(date(2024, 3, 1));
        assert_eq!(member.expiry_date, date(2024, 3, 1));

        member.expiry_date = member.extended_expiry(date(2024, 2, 15));
        assert_eq!(member.expiry_date, date(2024, 3, 1));

        member.expiry_date = member.extended_expiry(member.expiry_date);
        assert_eq!(member.expiry_date, date(2024, 3, 1));
    }

    #[test]
    fn test_sanitize_phone() {
        assert_eq!(sanitize_phone("+1 (234) 567-8900"), "+12345678900");
        assert_eq!(sanitize_phone("123-456-7890"), "1234567890");
        assert_eq!(sanitize_phone("12+34"), "1234");
        assert_eq!(sanitize_phone(""), "");
    }
}
