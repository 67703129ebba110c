//! RowBatch resolution: ordering, row counts, decoding and shape errors.

mod test_data_gen;

use splitscan_core::error::Error as CoreError;
use splitscan_core::schema::{DataType, Field, Schema};
use splitscan_core::types::{Column, RowBatch, Scalar};
use splitscan_io::{BatchResolver, Error, RowBatchResolver};
use test_data_gen::{id_label_batch, id_label_schema};

fn resolver() -> RowBatchResolver {
    RowBatchResolver::new(id_label_schema()).expect("valid schema")
}

#[test]
fn test_rows_follow_stored_order() {
    let rows = resolver().resolve(&id_label_batch(0, 3)).unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Scalar::I64(0), Scalar::Null],
            vec![Scalar::I64(1), Scalar::Str("row-1".into())],
            vec![Scalar::I64(2), Scalar::Str("row-2".into())],
        ]
    );
}

#[test]
fn test_permuted_input_permutes_output() {
    let batch = RowBatch::new(vec![
        Column::new("id", vec![Scalar::I64(2), Scalar::I64(0), Scalar::I64(1)]),
        Column::new(
            "label",
            vec![Scalar::Str("c".into()), Scalar::Null, Scalar::Str("b".into())],
        ),
    ]);
    let rows = resolver().resolve(&batch).unwrap();
    let ids: Vec<&Scalar> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(ids, vec![&Scalar::I64(2), &Scalar::I64(0), &Scalar::I64(1)]);
    assert_eq!(rows[1][1], Scalar::Null);
}

#[test]
fn test_one_row_per_batch_row() {
    let r = resolver();
    for n in [0usize, 1, 7, 64] {
        let batch = id_label_batch(100, n);
        let rows = r.resolve(&batch).unwrap();
        assert_eq!(rows.len(), batch.num_rows());
        assert!(rows.iter().all(|row| row.len() == r.schema().len()));
    }
}

#[test]
fn test_int32_widens_to_int64() {
    let schema = Schema::new(vec![Field::new("n", DataType::Int64, false)]);
    let r = RowBatchResolver::new(schema).unwrap();
    let batch = RowBatch::new(vec![Column::new("n", vec![Scalar::I32(-4), Scalar::I32(9)])]);
    let rows = r.resolve(&batch).unwrap();
    assert_eq!(rows, vec![vec![Scalar::I64(-4)], vec![Scalar::I64(9)]]);
}

#[test]
fn test_null_in_non_nullable_column() {
    let batch = RowBatch::new(vec![
        Column::new("id", vec![Scalar::I64(1), Scalar::Null]),
        Column::new("label", vec![Scalar::Null, Scalar::Null]),
    ]);
    match resolver().resolve(&batch) {
        Err(Error::Core(CoreError::Decode {
            row,
            column,
            message,
        })) => {
            assert_eq!(row, 1);
            assert_eq!(column, "id");
            assert_eq!(message, "null in non-nullable column");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_type_mismatch_names_stored_and_declared_types() {
    let batch = RowBatch::new(vec![
        Column::new("id", vec![Scalar::I64(1)]),
        Column::new("label", vec![Scalar::I64(5)]),
    ]);
    let err = resolver().resolve(&batch).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Decode error at row 0, column 'label': stored I64 cannot be decoded as Utf8"
    );
}

#[test]
fn test_column_count_mismatch() {
    let batch = RowBatch::new(vec![Column::new("id", vec![Scalar::I64(1)])]);
    let err = resolver().resolve(&batch).unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::Schema(_))));
    assert!(err
        .to_string()
        .contains("batch has 1 columns, schema declares 2"));
}

#[test]
fn test_ragged_batch_rejected() {
    let batch = RowBatch::new(vec![
        Column::new("id", vec![Scalar::I64(1), Scalar::I64(2)]),
        Column::new("label", vec![Scalar::Null]),
    ]);
    let err = resolver().resolve(&batch).unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::Invariant(_))));
}

#[test]
fn test_invalid_schema_rejected_up_front() {
    let dup = Schema::new(vec![
        Field::new("a", DataType::Int32, false),
        Field::new("a", DataType::Int64, false),
    ]);
    assert!(RowBatchResolver::new(dup).is_err());
    assert!(RowBatchResolver::new(Schema::new(vec![])).is_err());
}

#[test]
fn test_decimal_and_date_values_pass_through() {
    let schema = Schema::new(vec![
        Field::new(
            "amount",
            DataType::Decimal128 {
                precision: 10,
                scale: 2,
            },
            true,
        ),
        Field::new("day", DataType::Date64, true),
    ]);
    let r = RowBatchResolver::new(schema).unwrap();
    let amount = Scalar::Decimal128 {
        value: 123_456,
        scale: 2,
    };
    let batch = RowBatch::new(vec![
        Column::new("amount", vec![amount.clone()]),
        Column::new("day", vec![Scalar::Date64(86_400_000)]),
    ]);
    let rows = r.resolve(&batch).unwrap();
    assert_eq!(rows, vec![vec![amount, Scalar::Date64(86_400_000)]]);
}
