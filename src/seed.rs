//! Sample data and the guided walk-through used by `labsmart init` and
//! `labsmart demo`.

use serde::Serialize;

use crate::db::{DatabaseError, SessionFactory};
use crate::lab;
use crate::models::*;

#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub patients: Vec<Patient>,
    pub technicians: Vec<Technician>,
    pub test_types: Vec<TestType>,
    pub orders: Vec<TestOrder>,
    pub results: Vec<TestResult>,
}

/// Insert the sample lab: two patients, two technicians, two test types,
/// one order each and a CBC result for the first.
pub fn seed_sample_data(sessions: &SessionFactory) -> Result<SeedSummary, DatabaseError> {
    tracing::info!("Seeding sample data");

    let p1 = lab::create_patient(sessions, &NewPatient {
        first_name: "Amina".into(),
        last_name: "Mohamed".into(),
        date_of_birth: Some("1990-05-10".into()),
        gender: Some("F".into()),
        contact: Some("+254700000001".into()),
    })?;
    let p2 = lab::create_patient(sessions, &NewPatient {
        first_name: "John".into(),
        last_name: "Karanja".into(),
        date_of_birth: Some("1985-08-22".into()),
        gender: Some("M".into()),
        contact: Some("+254700000002".into()),
    })?;

    let t1 = lab::create_technician(sessions, &NewTechnician {
        name: "Grace W.".into(),
        role: Some("Lab Technician".into()),
        contact: Some("+254700000010".into()),
    })?;
    let t2 = lab::create_technician(sessions, &NewTechnician {
        name: "Sam O.".into(),
        role: Some("Senior Technician".into()),
        contact: Some("+254700000011".into()),
    })?;

    let tt1 = lab::create_test_type(sessions, &NewTestType {
        code: "CBC".into(),
        name: "Complete Blood Count".into(),
        description: Some("Full blood count".into()),
    })?;
    let tt2 = lab::create_test_type(sessions, &NewTestType {
        code: "BMP".into(),
        name: "Basic Metabolic Panel".into(),
        description: Some("Electrolytes and metabolites".into()),
    })?;

    let o1 = lab::order_test(sessions, p1.id, tt1.id)?;
    let o2 = lab::order_test(sessions, p2.id, tt2.id)?;

    let r1 = lab::record_result(
        sessions,
        o1.id,
        t1.id,
        "WBC: 5.6 x10^9/L; RBC: 4.6 x10^12/L; Hb: 13.8 g/dL",
    )?;

    // The result is committed; reload the order to report its new status.
    let o1 = lab::get_order(sessions, o1.id)?.unwrap_or(o1);

    tracing::info!("Sample data ready");
    Ok(SeedSummary {
        patients: vec![p1, p2],
        technicians: vec![t1, t2],
        test_types: vec![tt1, tt2],
        orders: vec![o1, o2],
        results: vec![r1],
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub patient: Patient,
    pub test_type: TestType,
    pub order: TestOrder,
    pub pending_before: Vec<OrderDetail>,
    pub result: Option<TestResult>,
    pub most_requested: Vec<TestTypeCount>,
    pub patient_record: Option<PatientRecord>,
}

/// Walk through a patient visit: register, order, complete, report.
///
/// The LFT test type is reused when a previous run already created it.
pub fn run_demo(sessions: &SessionFactory) -> Result<DemoReport, DatabaseError> {
    let patient = lab::create_patient(sessions, &NewPatient {
        first_name: "Fatuma".into(),
        last_name: "Ali".into(),
        date_of_birth: Some("2000-01-01".into()),
        gender: Some("F".into()),
        contact: Some("+254700000099".into()),
    })?;

    let test_type = match lab::get_test_type_by_code(sessions, "LFT")? {
        Some(existing) => existing,
        None => lab::create_test_type(sessions, &NewTestType {
            code: "LFT".into(),
            name: "Liver Function Test".into(),
            description: Some("Measures liver enzymes".into()),
        })?,
    };

    let order = lab::order_test(sessions, patient.id, test_type.id)?;
    let pending_before = lab::list_orders(sessions, Some(OrderStatus::Pending))?;

    // Newest pending order first: the one just placed.
    let result = match pending_before.first() {
        Some(first) => {
            let tech = lab::create_technician(sessions, &NewTechnician::new("Demo Tech"))?;
            Some(lab::record_result(sessions, first.order.id, tech.id, "ALT: 25 U/L; AST: 30 U/L")?)
        }
        None => None,
    };

    let most_requested = lab::most_requested_tests(sessions, DEFAULT_REPORT_LIMIT)?;
    let patient_record = lab::get_patient(sessions, patient.id)?;

    Ok(DemoReport {
        patient,
        test_type,
        order,
        pending_before,
        result,
        most_requested,
        patient_record,
    })
}
