//! Schema-driven conversion of remote records into [`Snapshot`] trees
//!
//! Each record type declares its own shape: which fields form a mapping, which are
//! repeated groups (sequences) and which are scalars. Keys are the portal's field
//! names so a stored snapshot reads like the service response it came from.

use super::value::Snapshot;
use crate::remote::{Appeal, CaseFile, Hearing, Party, QueryResponse};

/// Conversion into the canonical comparable form
pub trait Normalize {
    fn normalize(&self) -> Snapshot;
}

/// Canonical text form: line breaks collapse to `\n`
pub fn normalize_text(text: &str) -> String {
    if text.contains('\r') { text.replace("\r\n", "\n").replace('\r', "\n") } else { text.to_string() }
}

impl Normalize for str {
    fn normalize(&self) -> Snapshot {
        Snapshot::Scalar(normalize_text(self))
    }
}

impl Normalize for String {
    fn normalize(&self) -> Snapshot {
        self.as_str().normalize()
    }
}

/// Absent scalars normalize to the empty string
impl<T: Normalize> Normalize for Option<T> {
    fn normalize(&self) -> Snapshot {
        match self {
            Some(value) => value.normalize(),
            None => Snapshot::Scalar(String::new()),
        }
    }
}

impl<T: Normalize> Normalize for [T] {
    fn normalize(&self) -> Snapshot {
        Snapshot::Seq(self.iter().map(Normalize::normalize).collect())
    }
}

impl<T: Normalize> Normalize for Vec<T> {
    fn normalize(&self) -> Snapshot {
        self.as_slice().normalize()
    }
}

impl Normalize for QueryResponse {
    fn normalize(&self) -> Snapshot {
        Snapshot::record([("Dosar", self.cases.normalize())])
    }
}

impl Normalize for CaseFile {
    fn normalize(&self) -> Snapshot {
        Snapshot::record([
            ("numar", self.number.normalize()),
            ("numarVechi", self.old_number.normalize()),
            ("data", self.date.normalize()),
            ("institutie", self.court.normalize()),
            ("departament", self.department.normalize()),
            ("categorieCaz", self.category.normalize()),
            ("categorieCazNume", self.category_name.normalize()),
            ("stadiuProcesual", self.stage.normalize()),
            ("stadiuProcesualNume", self.stage_name.normalize()),
            ("obiect", self.subject.normalize()),
            ("dataModificare", self.modified.normalize()),
            ("parti", self.parties.normalize()),
            ("sedinte", self.hearings.normalize()),
            ("caiAtac", self.appeals.normalize()),
        ])
    }
}

impl Normalize for Party {
    fn normalize(&self) -> Snapshot {
        Snapshot::record([("nume", self.name.normalize()), ("calitateParte", self.role.normalize())])
    }
}

impl Normalize for Hearing {
    fn normalize(&self) -> Snapshot {
        Snapshot::record([
            ("complet", self.panel.normalize()),
            ("data", self.date.normalize()),
            ("ora", self.time.normalize()),
            ("solutie", self.ruling.normalize()),
            ("solutieSumar", self.ruling_summary.normalize()),
            ("dataPronuntare", self.pronounced_on.normalize()),
            ("documentSedinta", self.document.normalize()),
            ("numarDocument", self.document_number.normalize()),
            ("dataDocument", self.document_date.normalize()),
        ])
    }
}

impl Normalize for Appeal {
    fn normalize(&self) -> Snapshot {
        Snapshot::record([
            ("dataDeclarare", self.filed_on.normalize()),
            ("parteDeclaratoare", self.filed_by.normalize()),
            ("tipCaleAtac", self.kind.normalize()),
        ])
    }
}
