use chrono::NaiveDate;
use project_rater::config::ScoringPolicy;
use project_rater::output::to_xlsx_bytes;
use project_rater::pipeline::status::Status;
use project_rater::process_with;
use project_rater::report::{Summary, top_projects};
use project_rater::table::{Cell, Table};
use rust_xlsxwriter::{Format, Workbook};

const HEADER: [&str; 10] = [
    "Proyecto",
    "Dueño",
    "Impacto_ventas",
    "Tiempo_impl",
    "Facilidad",
    "Alineacion_vision",
    "Diferenciacion",
    "Riesgo_bajo",
    "Estado_manual",
    "ETD",
];

enum V {
    N(f64),
    T(&'static str),
    D(NaiveDate),
    E,
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn build_workbook(banner: bool, rows: &[Vec<V>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let sheet = workbook.add_worksheet();

    let mut r = 0u32;
    if banner {
        sheet.write_string(0, 0, "Tablero de Proyectos – Dark Board").unwrap();
        r = 2;
    }
    for (c, name) in HEADER.iter().enumerate() {
        sheet.write_string(r, c as u16, *name).unwrap();
    }
    for row in rows {
        r += 1;
        for (c, v) in row.iter().enumerate() {
            match v {
                V::N(n) => {
                    sheet.write_number(r, c as u16, *n).unwrap();
                }
                V::T(s) => {
                    sheet.write_string(r, c as u16, *s).unwrap();
                }
                V::D(d) => {
                    sheet
                        .write_datetime_with_format(r, c as u16, d, &date_format)
                        .unwrap();
                }
                V::E => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

fn board() -> Vec<Vec<V>> {
    use V::*;
    vec![
        vec![T("Urgente"), T("Luis"), E, E, T("0,5"), E, E, T("NO"), T("En curso"), T("2025-07-15")],
        vec![T("Portal"), T("Ana"), N(5.0), T("2 semanas"), T("4"), N(5.0), N(3.0), T("Sí"), E, T("2025-07-16")],
        vec![T("Atrasado"), T("Eva"), N(10.0), E, E, E, E, E, E, T("2025-06-14")],
        vec![T("Cerrado"), T("Ana"), N(1.0), E, E, E, E, E, T("  completado "), T("2024-01-01")],
        vec![T("Sin fecha"), T("Raúl"), N(6.0), E, E, N(6.0), E, T("3"), E, E],
    ]
}

fn column(table: &Table, name: &str) -> Vec<Cell> {
    let idx = table.column_index(name).unwrap();
    table.rows.iter().map(|r| r[idx].clone()).collect()
}

#[test]
fn test_full_pipeline() {
    let bytes = build_workbook(true, &board());
    let table = process_with(&bytes, &ScoringPolicy::default(), today()).expect("rating failed");

    let mut expected_columns: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();
    expected_columns.push("Score".into());
    expected_columns.push("Semaforo".into());
    assert_eq!(table.columns, expected_columns);

    assert_eq!(
        column(&table, "Proyecto"),
        vec![
            Cell::from("Portal"),
            Cell::from("Sin fecha"),
            Cell::from("Atrasado"),
            Cell::from("Cerrado"),
            Cell::from("Urgente"),
        ]
    );
    assert_eq!(
        column(&table, "Score"),
        vec![
            Cell::Number(37.0),
            Cell::Number(27.0),
            Cell::Number(20.0),
            Cell::Number(2.0),
            Cell::Number(1.75),
        ]
    );
    assert_eq!(
        column(&table, "Semaforo"),
        vec![
            Cell::from(Status::Strategic.label()),
            Cell::from(Status::ImportantNoEtd.label()),
            Cell::from(Status::Overdue.label()),
            Cell::from(Status::Completed.label()),
            Cell::from(Status::Urgent.label()),
        ]
    );
    assert_eq!(column(&table, "Dueño")[0], Cell::from("Ana"));
    assert_eq!(column(&table, "Tiempo_impl")[0], Cell::Number(2.0));
    assert_eq!(column(&table, "Riesgo_bajo")[0], Cell::Number(5.0));
}

#[test]
fn test_summary_and_top() {
    let bytes = build_workbook(true, &board());
    let table = process_with(&bytes, &ScoringPolicy::default(), today()).unwrap();

    let summary = Summary::from_table(&table);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.overdue, 1);
    assert_eq!(summary.urgent, 1);
    assert_eq!(summary.on_track, 2);
    assert_eq!(summary.parking, 0);

    let top = top_projects(&table, 3);
    assert_eq!(
        top.columns,
        vec!["Proyecto", "Dueño", "Score", "Semaforo", "ETD", "Estado_manual"]
    );
    assert_eq!(top.len(), 3);
}

#[test]
fn test_header_in_first_row() {
    let bytes = build_workbook(false, &board());
    let table = process_with(&bytes, &ScoringPolicy::default(), today()).unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(table.columns[0], "Proyecto");
}

#[test]
fn test_rerating_enriched_workbook_is_stable() {
    let bytes = build_workbook(true, &board());
    let first = process_with(&bytes, &ScoringPolicy::default(), today()).unwrap();

    let enriched = to_xlsx_bytes(&first).unwrap();
    let second = process_with(&enriched, &ScoringPolicy::default(), today()).unwrap();

    assert_eq!(second.columns, first.columns);
    assert_eq!(column(&second, "Score"), column(&first, "Score"));
    assert_eq!(column(&second, "Semaforo"), column(&first, "Semaforo"));
}

#[test]
fn test_not_a_workbook() {
    assert!(process_with(b"Proyecto,Score\n", &ScoringPolicy::default(), today()).is_err());
}

#[test]
fn test_process_uses_default_policy() {
    let bytes = build_workbook(true, &board());
    let table = project_rater::process(&bytes).unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(column(&table, "Score")[0], Cell::Number(37.0));
}

#[test]
fn test_date_formatted_etd_cells() {
    use V::*;
    let yesterday = today().pred_opt().unwrap();
    let in_31_days = today().checked_add_days(chrono::Days::new(31)).unwrap();
    let rows = vec![
        vec![T("Vencido"), T("Ana"), N(50.0), E, E, E, E, E, E, D(yesterday)],
        vec![T("Lejano"), T("Eva"), N(10.0), E, E, N(10.0), E, E, E, D(in_31_days)],
    ];

    let bytes = build_workbook(true, &rows);
    let table = process_with(&bytes, &ScoringPolicy::default(), today()).unwrap();

    assert_eq!(
        column(&table, "Proyecto"),
        vec![Cell::from("Vencido"), Cell::from("Lejano")]
    );
    assert_eq!(
        column(&table, "Semaforo"),
        vec![
            Cell::from(Status::Overdue.label()),
            Cell::from(Status::Strategic.label()),
        ]
    );
    assert_eq!(
        column(&table, "ETD")[0],
        Cell::Date(yesterday.and_hms_opt(0, 0, 0).unwrap())
    );
}
