//! Writes keys into fixed-size data blocks with the suffix collector, then
//! scans them back through block property filters.

use blockprop_core::testkeys;
use blockprop_core::{
    new_block_property_collector, new_block_property_filter, new_masking_filter,
    BlockPropertiesEncoder, BlockPropertiesFilterer, BlockPropertyCollector, BlockPropertyFilter,
    BlockPropertyFilterMask, InternalKey, InternalKeyKind, Interval,
};
use std::collections::HashMap;

const SHORT_ID: u8 = 0;

struct Block {
    keys: Vec<Vec<u8>>,
    props: Vec<u8>,
}

struct Table {
    blocks: Vec<Block>,
    short_ids: HashMap<String, u8>,
    table_prop: Vec<u8>,
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_table(keys: &[&str], block_size: usize) -> Table {
    let mut keys = keys.to_vec();
    keys.sort_by(|a, b| testkeys::compare(a.as_bytes(), b.as_bytes()));

    let mut collector = new_block_property_collector();
    let mut encoder = BlockPropertiesEncoder::new();
    let mut blocks = Vec::new();

    for (n, chunk) in keys.chunks(block_size).enumerate() {
        for (i, k) in chunk.iter().enumerate() {
            let key = InternalKey::new(
                k.as_bytes().to_vec(),
                (n * block_size + i) as u64,
                InternalKeyKind::Set,
            );
            collector.add(&key, b"value").unwrap();
        }
        let mut prop = Vec::new();
        collector.finish_data_block(&mut prop).unwrap();
        collector.add_prev_data_block_to_index_block();
        encoder.add(SHORT_ID, &prop).unwrap();
        blocks.push(Block {
            keys: chunk.iter().map(|k| k.as_bytes().to_vec()).collect(),
            props: encoder.finish(),
        });
    }

    let mut table_prop = Vec::new();
    collector.finish_table(&mut table_prop).unwrap();

    let mut short_ids = HashMap::new();
    short_ids.insert(collector.name().to_string(), SHORT_ID);
    Table {
        blocks,
        short_ids,
        table_prop,
    }
}

fn scan(table: &Table, filter: &dyn BlockPropertyFilter) -> Vec<String> {
    let filterer = BlockPropertiesFilterer::new(&[filter], &table.short_ids).unwrap();
    let mut seen = Vec::new();
    for block in &table.blocks {
        if !filterer.intersects(&block.props).unwrap() {
            continue;
        }
        seen.extend(
            block
                .keys
                .iter()
                .map(|k| String::from_utf8(k.clone()).unwrap()),
        );
    }
    seen
}

#[test]
fn test_range_scan_skips_out_of_range_blocks() {
    init_logging();
    let table = write_table(
        &["a@1", "b@2", "c@3", "d@10", "e@11", "f@12", "g@20", "h", "i@21"],
        3,
    );
    assert_eq!(
        Interval::decode(&table.table_prop).unwrap(),
        Interval::UNBOUNDED
    );

    let filter = new_block_property_filter(10, 13);
    let seen = scan(&table, &filter);
    // Middle block is in range; the last block holds an unsuffixed key
    assert_eq!(seen, vec!["d@10", "e@11", "f@12", "g@20", "h", "i@21"]);
}

#[test]
fn test_in_range_and_unsuffixed_keys_always_visited() {
    init_logging();
    let keys = [
        "a@5", "a@50", "b", "c@7", "d@70", "e@8", "f@80", "g@9", "h@90", "i",
    ];
    for block_size in 1..=keys.len() {
        let table = write_table(&keys, block_size);
        let filter = new_block_property_filter(5, 10);
        let seen = scan(&table, &filter);
        for must in ["a@5", "b", "c@7", "e@8", "g@9", "i"] {
            assert!(
                seen.iter().any(|k| k == must),
                "{} missing with block size {}",
                must,
                block_size
            );
        }
    }
}

#[test]
fn test_masking_hides_older_blocks() {
    init_logging();
    let table = write_table(&["a@1", "b@2", "c@5", "d@6", "e@9", "f@10"], 2);
    let mut mask = new_masking_filter();

    assert_eq!(scan(&table, &mask).len(), 6);

    mask.set_suffix(&testkeys::suffix(6)).unwrap();
    assert_eq!(scan(&table, &mask), vec!["c@5", "d@6", "e@9", "f@10"]);

    mask.set_suffix(b"@10").unwrap();
    assert_eq!(scan(&table, &mask), vec!["e@9", "f@10"]);

    assert!(mask.set_suffix(b"@ten").is_err());
    assert_eq!(scan(&table, &mask), vec!["e@9", "f@10"]);
}

#[test]
fn test_versions_of_a_key_share_blocks_newest_first() {
    let table = write_table(&["k@1", "k", "k@30", "k@2"], 2);
    let first: Vec<&[u8]> = table.blocks[0].keys.iter().map(|k| &k[..]).collect();
    assert_eq!(first, vec![&b"k"[..], &b"k@30"[..]]);

    // Older versions land in their own block and can be skipped
    let filter = new_block_property_filter(10, 40);
    assert_eq!(scan(&table, &filter), vec!["k", "k@30"]);
}

#[test]
fn test_masking_at_max_timestamp_keeps_unsuffixed_keys() {
    let table = write_table(&["a@1", "b@2", "c", "d@3"], 2);
    let mut mask = new_masking_filter();
    mask.set_suffix(&testkeys::suffix(u64::MAX)).unwrap();
    assert_eq!(scan(&table, &mask), vec!["c", "d@3"]);
}

#[test]
fn test_malformed_suffix_aborts_write() {
    let mut collector = new_block_property_collector();
    let bad = InternalKey::new(&b"a@1.5"[..], 1, InternalKeyKind::Set);
    let err = collector.add(&bad, b"").unwrap_err();
    assert!(err.is_suffix_parse());
}
