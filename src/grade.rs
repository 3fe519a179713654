// src/grade.rs
//
// Completeness grading. Rules are checked top-down and the first match wins,
// so the grade is not a count of filled fields: an address-only page is F.

use crate::{
    config::options::GradePolicy,
    lead::{Grade, ProfileRecord},
};

/// Which graded contact channels a profile has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Presence {
    pub phone: bool,
    pub whatsapp: bool,
    pub email: bool,
    pub website: bool,
}

impl Presence {
    pub fn of(p: &ProfileRecord) -> Self {
        let present = |s: &str| !s.trim().is_empty();
        Self {
            phone: present(&p.phone),
            whatsapp: present(&p.whatsapp),
            email: present(&p.email),
            website: present(&p.website),
        }
    }
}

pub fn grade(p: Presence, policy: GradePolicy) -> Grade {
    let callable = p.phone || p.whatsapp;
    let a_extra = match policy {
        GradePolicy::Classic => true,
        GradePolicy::WhatsAppForA => p.whatsapp,
    };

    if callable && p.email && p.website && a_extra {
        Grade::A
    } else if callable && (p.email || p.website) {
        Grade::B
    } else if callable {
        Grade::C
    } else if p.email && p.website {
        Grade::D
    } else if p.email || p.website {
        Grade::E
    } else {
        Grade::F
    }
}

pub fn grade_profile(p: &ProfileRecord, policy: GradePolicy) -> Grade {
    grade(Presence::of(p), policy)
}
