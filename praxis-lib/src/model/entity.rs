//! Entity collections exposed by the practice API

/// An entity collection served by the backend.
///
/// Each collection knows the path of its list endpoint and the payload key
/// its bulk-delete action expects. Patient kinds live under the `patients/`
/// app, the catalog collections under `others/`.
///
/// # Example
///
/// ```
/// use praxis_lib::model::Entity;
///
/// assert_eq!(Entity::Adults.collection_path(), "patients/adults");
/// assert_eq!(Entity::Clinics.bulk_delete_key(), "clinic_ids");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// All patients, adult and pediatric.
    Patients,
    /// Adult patients with the full anamnesis fields.
    Adults,
    /// Pediatric patients.
    Pediatrics,
    /// Clinics of the practice.
    Clinics,
    /// Symptoms presented as complaints.
    Symptoms,
    /// Family-history catalog entries.
    FamilyHistory,
    /// Medical-condition catalog entries.
    Medical,
    /// Cyanosis catalog entries.
    Cyanosis,
    /// Drug catalog entries.
    Drugs,
}

impl Entity {
    /// All entity collections, in navigation order.
    pub const ALL: [Entity; 9] = [
        Entity::Patients,
        Entity::Adults,
        Entity::Pediatrics,
        Entity::Clinics,
        Entity::Symptoms,
        Entity::FamilyHistory,
        Entity::Medical,
        Entity::Cyanosis,
        Entity::Drugs,
    ];

    /// The list-endpoint path of this collection, relative to the API root.
    pub fn collection_path(&self) -> &'static str {
        match self {
            Entity::Patients => "patients/patients",
            Entity::Adults => "patients/adults",
            Entity::Pediatrics => "patients/pediatrics",
            Entity::Clinics => "others/clinics",
            Entity::Symptoms => "others/symptoms",
            Entity::FamilyHistory => "others/family-history",
            Entity::Medical => "others/medical",
            Entity::Cyanosis => "others/cyanosis",
            Entity::Drugs => "others/drugs",
        }
    }

    /// The singular logical name of a record in this collection.
    pub fn logical_name(&self) -> &'static str {
        match self {
            Entity::Patients => "patient",
            Entity::Adults => "adult",
            Entity::Pediatrics => "pediatric",
            Entity::Clinics => "clinic",
            Entity::Symptoms => "symptom",
            Entity::FamilyHistory => "family_history",
            Entity::Medical => "medical",
            Entity::Cyanosis => "cyanosis",
            Entity::Drugs => "drug",
        }
    }

    /// The payload key the bulk-delete endpoint expects, e.g. `patient_ids`.
    pub fn bulk_delete_key(&self) -> &'static str {
        match self {
            Entity::Patients => "patient_ids",
            Entity::Adults => "adult_ids",
            Entity::Pediatrics => "pediatric_ids",
            Entity::Clinics => "clinic_ids",
            Entity::Symptoms => "symptom_ids",
            Entity::FamilyHistory => "family_history_ids",
            Entity::Medical => "medical_ids",
            Entity::Cyanosis => "cyanosis_ids",
            Entity::Drugs => "drug_ids",
        }
    }

    /// Key prefix under which list responses for this collection are cached.
    pub fn cache_prefix(&self) -> String {
        format!("list:{}:", self.collection_path())
    }

    /// Human-readable plural label for navigation and headings.
    pub fn display_label(&self) -> &'static str {
        match self {
            Entity::Patients => "Patients",
            Entity::Adults => "Adults",
            Entity::Pediatrics => "Pediatrics",
            Entity::Clinics => "Clinics",
            Entity::Symptoms => "Symptoms",
            Entity::FamilyHistory => "Family History",
            Entity::Medical => "Medical",
            Entity::Cyanosis => "Cyanosis",
            Entity::Drugs => "Drugs",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_label())
    }
}
