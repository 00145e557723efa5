// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Species identification sub-rules spliced into the Snakefile.
//!
//! When a usable classification database is found every field carries a
//! rule fragment; otherwise all fields are empty strings and the Snakefile
//! template renders without species identification.

/// Final targets added to the `all` rule.
const OUTPUT_TARGETS: &str = "\"species_identification.tab\",\n\"report/species_identification.tab\",\nexpand(\"{sample}/kraken.tab\", sample = SAMPLE)";

const SUMMARY_RULE: &str = r##"
rule combine_kraken:
	input:
		expand("{sample}/kraken.tab", sample = SAMPLE)
	output:
		"species_identification.tab"
	run:
		import csv, pathlib
		header = ["Isolate", "#1 Match", "%1", "#2 Match", "%2", "#3 Match", "%3", "#4 Match", "%4"]
		with open(f"{output}", "w", newline = "") as out:
			writer = csv.writer(out, delimiter = "\t")
			writer.writerow(header)
			for report in f"{input}".split():
				rows = []
				with open(report) as fh:
					for line in fh:
						cols = line.rstrip("\n").split("\t")
						if len(cols) >= 6 and cols[3] in ("U", "S"):
							rows.append((float(cols[0].strip().rstrip("%")), cols[5].strip()))
				rows.sort(key = lambda r: r[0], reverse = True)
				row = [pathlib.Path(report).parts[0]]
				for pct, name in rows[:4]:
					row.extend([name, pct])
				writer.writerow(row)
"##;

/// Rule fragments for species identification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesRules {
    pub output: String,
    pub rule: String,
    pub summary: String,
    pub report: String,
    pub summary_target: String,
    pub copy: String,
}

impl SpeciesRules {
    /// Fragments used when species identification is skipped.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Fragments for a run with a usable database.
    ///
    /// A per-isolate result found under `prefill_path` is copied instead of
    /// reclassifying. Memory mapping is only requested for local runs, where
    /// the database is on a local disk.
    pub fn enabled(prefill_path: &str, cluster: bool) -> Self {
        Self {
            output: OUTPUT_TARGETS.to_string(),
            rule: per_sample_rule(prefill_path, cluster),
            summary: SUMMARY_RULE.to_string(),
            report: "'report/species_identification.tab'".to_string(),
            summary_target: "'species_identification.tab'".to_string(),
            copy: "cp species_identification.tab report/species_identification.tab".to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.rule.is_empty()
    }
}

fn per_sample_rule(prefill_path: &str, cluster: bool) -> String {
    let mem_mapping = if cluster { "" } else { " --memory-mapping" };
    format!(
        r#"
rule kraken:
	input:
		'READS/{{sample}}/R1.fq.gz',
		'READS/{{sample}}/R2.fq.gz'
	output:
		"{{sample}}/kraken.tab"
	shell:
		"""
		KRAKENPATH={prefill_path}{{wildcards.sample}}/kraken2.tab
		if [ -f $KRAKENPATH ]; then
			cp $KRAKENPATH {{output}}
		else
			kraken2 --paired {{input[0]}} {{input[1]}} --minimum-base-quality 13 --report {{output}}{mem_mapping}
		fi
		"""
"#
    )
}

#[cfg(test)]
#[path = "species_tests.rs"]
mod tests;
