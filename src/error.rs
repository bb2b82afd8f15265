use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{record}: missing required field `{field}`")]
    MissingField { record: String, field: &'static str },

    #[error("{record}: SNP coordinate `{value}` is not an integer")]
    InvalidCoordinate { record: String, value: String },

    #[error("{record}: `{field}` must be a single base, got `{value}`")]
    InvalidAllele {
        record: String,
        field: &'static str,
        value: String,
    },

    #[error("{record}: field {field} is not valid UTF-8")]
    InvalidUtf8 { record: String, field: usize },

    #[error("{record}: SNP coordinate {coordinate} outside sequence of length {length}")]
    SnpOutOfBounds {
        record: String,
        coordinate: i64,
        length: usize,
    },

    #[error("sequence of length {length} has no dinucleotide to score")]
    InvalidInputLength { length: usize },

    #[error("{record}: no sequence in the table and none in the FASTA file")]
    SequenceNotFound { record: String },

    #[error("reaction condition `{name}` must be a positive finite number, got {value}")]
    InvalidCondition { name: &'static str, value: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Fasta(#[from] seq_io::fasta::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_errors_name_the_record() {
        let err = ProbeError::SnpOutOfBounds {
            record: "rs123".to_string(),
            coordinate: 40,
            length: 20,
        };
        assert_eq!(
            err.to_string(),
            "rs123: SNP coordinate 40 outside sequence of length 20"
        );

        let err = ProbeError::MissingField {
            record: "row 4".to_string(),
            field: "Alelo_Alt",
        };
        assert_eq!(err.to_string(), "row 4: missing required field `Alelo_Alt`");
    }
}
