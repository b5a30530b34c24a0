//! Typed records returned by the portal
//!
//! Field names follow the portal schema (`Dosar`, `DosarParte`, `DosarSedinta`,
//! `DosarCaleAtac`). Every scalar is kept exactly as the service rendered it; a field
//! the service omitted is `None`.

use super::xml::XmlNode;

/// Result of one `CautareDosare` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResponse {
    pub cases: Vec<CaseFile>,
}

/// One case file (`Dosar`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFile {
    pub number: Option<String>,
    pub old_number: Option<String>,
    pub date: Option<String>,
    pub court: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub category_name: Option<String>,
    pub stage: Option<String>,
    pub stage_name: Option<String>,
    pub subject: Option<String>,
    pub modified: Option<String>,
    pub parties: Vec<Party>,
    pub hearings: Vec<Hearing>,
    pub appeals: Vec<Appeal>,
}

/// A party to the case (`DosarParte`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    pub name: Option<String>,
    pub role: Option<String>,
}

/// A scheduled or past hearing (`DosarSedinta`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hearing {
    pub panel: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub ruling: Option<String>,
    pub ruling_summary: Option<String>,
    pub pronounced_on: Option<String>,
    pub document: Option<String>,
    pub document_number: Option<String>,
    pub document_date: Option<String>,
}

/// An appeal filed in the case (`DosarCaleAtac`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Appeal {
    pub filed_on: Option<String>,
    pub filed_by: Option<String>,
    pub kind: Option<String>,
}

fn repeated<T>(node: &XmlNode, group: &str, item: &str, f: fn(&XmlNode) -> T) -> Vec<T> {
    node.child(group).map(|g| g.children_named(item).map(f).collect()).unwrap_or_default()
}

impl QueryResponse {
    /// Extract the records from a `CautareDosareResult` element
    pub fn from_node(result: &XmlNode) -> Self {
        Self { cases: result.children_named("Dosar").map(CaseFile::from_node).collect() }
    }
}

impl CaseFile {
    pub fn from_node(node: &XmlNode) -> Self {
        Self {
            number: node.child_text("numar"),
            old_number: node.child_text("numarVechi"),
            date: node.child_text("data"),
            court: node.child_text("institutie"),
            department: node.child_text("departament"),
            category: node.child_text("categorieCaz"),
            category_name: node.child_text("categorieCazNume"),
            stage: node.child_text("stadiuProcesual"),
            stage_name: node.child_text("stadiuProcesualNume"),
            subject: node.child_text("obiect"),
            modified: node.child_text("dataModificare"),
            parties: repeated(node, "parti", "DosarParte", Party::from_node),
            hearings: repeated(node, "sedinte", "DosarSedinta", Hearing::from_node),
            appeals: repeated(node, "caiAtac", "DosarCaleAtac", Appeal::from_node),
        }
    }
}

impl Party {
    pub fn from_node(node: &XmlNode) -> Self {
        Self { name: node.child_text("nume"), role: node.child_text("calitateParte") }
    }
}

impl Hearing {
    pub fn from_node(node: &XmlNode) -> Self {
        Self {
            panel: node.child_text("complet"),
            date: node.child_text("data"),
            time: node.child_text("ora"),
            ruling: node.child_text("solutie"),
            ruling_summary: node.child_text("solutieSumar"),
            pronounced_on: node.child_text("dataPronuntare"),
            document: node.child_text("documentSedinta"),
            document_number: node.child_text("numarDocument"),
            document_date: node.child_text("dataDocument"),
        }
    }
}

impl Appeal {
    pub fn from_node(node: &XmlNode) -> Self {
        Self {
            filed_on: node.child_text("dataDeclarare"),
            filed_by: node.child_text("parteDeclaratoare"),
            kind: node.child_text("tipCaleAtac"),
        }
    }
}
