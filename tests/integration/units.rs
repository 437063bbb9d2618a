use varaus_admin::services::units::UnitRow;

use crate::common::{context, MockPersistence};

#[test]
fn test_unit_rows_count_all_resources() {
    let ctx = context(MockPersistence::new());
    let rows = ctx.services.units.rows(&ctx.units, &ctx.catalog);

    assert_eq!(
        rows,
        vec![
            UnitRow {
                unit_id: "unit-1".into(),
                name: "Pursilahden venesatama".into(),
                boat_resource_count: 2,
            },
            UnitRow {
                unit_id: "unit-2".into(),
                name: "Vuosaaren talvisäilytys".into(),
                boat_resource_count: 1,
            },
            UnitRow {
                unit_id: "unit-3".into(),
                name: "Tyhjä satama".into(),
                boat_resource_count: 0,
            },
        ]
    );
}
