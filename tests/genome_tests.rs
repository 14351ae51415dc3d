use bodies::simulation::genome::{
    self, CONTROL_MIN, GeneType, Genome, create_genome, read_genome, replicate_genome,
};
use bodies::simulation::params::{Params, Settings};
use bodies::simulation::prng::Prng;

fn create_test_params() -> Params {
    Params {
        bits_per_mass: 1.0,
        bits_per_spike_length: 1.0,
        ..Params::default()
    }
}

/// Params with every mutation operator switched off.
fn still_params() -> Params {
    Params {
        chance_mutate_bit: 0.0,
        chance_drop_byte: 0.0,
        chance_repeat_byte: 0.0,
        chance_transpose_byte: 0.0,
        chance_drop_gene: 0.0,
        chance_repeat_gene: 0.0,
        chance_transpose_gene: 0.0,
        ..create_test_params()
    }
}

fn sample_genome() -> Genome {
    Genome::from(vec![0x07, 0xF0, 0x0F, 0x03, 0xF1, 0x01, 0xF5, 0x0F])
}

#[test]
fn test_genes_are_split_at_control_bytes() {
    let genome = sample_genome();
    let genes = genome.genes();

    assert_eq!(genes.len(), 3);

    assert_eq!(genes[0].control, 0xF0);
    assert_eq!(genes[0].location, 0.125);
    assert_eq!(genes[0].body, &[0x0F, 0x03]);
    assert_eq!(genes[0].gene_type(), Some(GeneType::Size));

    assert_eq!(genes[1].control, 0xF1);
    assert_eq!(genes[1].location, 0.5);
    assert_eq!(genes[1].body, &[0x01]);

    assert_eq!(genes[2].control, 0xF5);
    assert_eq!(genes[2].location, 0.75);
    assert_eq!(genes[2].gene_type(), None);
}

#[test]
fn test_adjacent_control_bytes_make_empty_genes() {
    let genome = Genome::from(vec![0xF0, 0xF1, 0xF2]);
    let genes = genome.genes();

    assert_eq!(genes.len(), 3);
    assert!(genes.iter().all(|gene| gene.body.is_empty()));
}

#[test]
fn test_read_genome_bit_census() {
    let settings = Settings::new(create_test_params());
    let commands = read_genome(&sample_genome(), &settings);

    // 0x0F has four bits, 0x03 has two
    assert_eq!(commands.size, 6);
    assert_eq!(commands.spikes.len(), 1);
    assert_eq!(commands.spikes[0].angle, 0.5);
    assert_eq!(commands.spikes[0].length, 1);
    assert_eq!(commands.hue, 0.0);
}

#[test]
fn test_read_genome_scales_by_bits_per_unit() {
    let settings = Settings::new(Params {
        bits_per_mass: 0.5,
        bits_per_spike_length: 4.0,
        ..Params::default()
    });
    let genome = Genome::from(vec![0xF0, 0x07, 0xF1, 0x0F, 0x0F]);
    let commands = read_genome(&genome, &settings);

    assert_eq!(commands.size, 6);
    // spike body 0x0F, 0x0F: eight bits over four per pixel
    assert_eq!(commands.spikes[0].length, 2);
}

#[test]
fn test_each_spike_gene_yields_one_spike() {
    let settings = Settings::new(create_test_params());
    let genome = Genome::from(vec![0xF1, 0x01, 0xF1, 0x03, 0x03, 0xF1]);
    let commands = read_genome(&genome, &settings);

    let lengths: Vec<u32> = commands.spikes.iter().map(|spike| spike.length).collect();
    let angles: Vec<f64> = commands.spikes.iter().map(|spike| spike.angle).collect();
    assert_eq!(lengths, vec![1, 4, 0]);
    assert_eq!(angles, vec![0.0, 2.0 / 6.0, 5.0 / 6.0]);
}

#[test]
fn test_colour_genes_set_hue() {
    let settings = Settings::new(create_test_params());

    let red = read_genome(&Genome::from(vec![0xF2, 0x0F]), &settings);
    let green = read_genome(&Genome::from(vec![0xF3, 0x0F]), &settings);
    let blue = read_genome(&Genome::from(vec![0xF4, 0x0F]), &settings);

    assert_eq!(red.hue, 0.0);
    assert!((green.hue - 1.0 / 3.0).abs() < 1e-12);
    assert!((blue.hue - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_genome_without_control_bytes_is_blank() {
    let settings = Settings::new(create_test_params());
    let genome = Genome::from(vec![0x01, 0x7F, 0xEF]);

    assert!(genome.genes().is_empty());

    let commands = read_genome(&genome, &settings);
    assert_eq!(commands.size, 0);
    assert!(commands.spikes.is_empty());
    assert_eq!(commands.hue, 0.0);
}

#[test]
fn test_empty_genome_is_blank() {
    let settings = Settings::new(create_test_params());
    let commands = read_genome(&Genome::default(), &settings);

    assert_eq!(commands, genome::Commands::default());
}

#[test]
fn test_create_genome_shape() {
    let settings = Settings::new(create_test_params());
    let mut prng = Prng::from_seed("create").unwrap();

    for _ in 0..200 {
        let genome = create_genome(&mut prng, &settings);
        let bytes = genome.as_bytes();
        let genes = genome.genes();

        assert!(genome::is_control(bytes[0]), "genome must open with a gene");
        assert!((1..=settings.max_gene_count as usize).contains(&genes.len()));

        for gene in &genes {
            assert!(gene.gene_type().is_some());
            assert!((1..=settings.max_gene_size as usize).contains(&gene.body.len()));
            assert!(gene.body.iter().all(|&byte| byte < CONTROL_MIN));
        }
    }
}

#[test]
fn test_create_genome_follows_odds() {
    let settings = Settings::new(Params {
        size_gene_odds: 0.0,
        spike_gene_odds: 1.0,
        red_gene_odds: 0.0,
        green_gene_odds: 0.0,
        blue_gene_odds: 0.0,
        ..create_test_params()
    });
    let mut prng = Prng::from_seed("odds").unwrap();
    let genome = create_genome(&mut prng, &settings);

    assert!(
        genome
            .genes()
            .iter()
            .all(|gene| gene.gene_type() == Some(GeneType::Spike))
    );
}

#[test]
fn test_pick_gene_thresholds() {
    let settings = Settings::new(create_test_params());

    assert_eq!(settings.pick_gene(0.0), GeneType::Size);
    assert_eq!(settings.pick_gene(0.29), GeneType::Size);
    assert_eq!(settings.pick_gene(0.31), GeneType::Spike);
    assert_eq!(settings.pick_gene(0.6), GeneType::Red);
    assert_eq!(settings.pick_gene(0.99), GeneType::Blue);

    let short = Settings::new(Params {
        blue_gene_odds: 0.05,
        ..create_test_params()
    });
    assert_eq!(short.pick_gene(0.95), GeneType::Blue);
}

#[test]
fn test_replicate_without_mutation_is_identical() {
    let settings = Settings::new(still_params());
    let mut prng = Prng::from_seed("still").unwrap();
    let genome = sample_genome();

    assert_eq!(replicate_genome(&genome, &mut prng, &settings), genome);
}

#[test]
fn test_replicate_does_not_touch_parent() {
    let settings = Settings::new(Params {
        volatility: 20.0,
        ..create_test_params()
    });
    let mut prng = Prng::from_seed("parent").unwrap();
    let genome = sample_genome();
    let before = genome.clone();

    let _child = replicate_genome(&genome, &mut prng, &settings);
    assert_eq!(genome, before);
}

#[test]
fn test_bit_mutation_flips_every_bit_at_certainty() {
    let settings = Settings::new(Params {
        chance_mutate_bit: 1.0,
        ..still_params()
    });
    let mut prng = Prng::from_seed("flip").unwrap();
    let genome = Genome::from(vec![0x0F, 0xF0, 0x00, 0x55]);
    let child = replicate_genome(&genome, &mut prng, &settings);

    assert_eq!(child.as_bytes(), &[0xF0, 0x0F, 0xFF, 0xAA]);
}

#[test]
fn test_byte_drop_at_certainty_empties_genome() {
    let settings = Settings::new(Params {
        chance_drop_byte: 1.0,
        ..still_params()
    });
    let mut prng = Prng::from_seed("drop").unwrap();
    let child = replicate_genome(&sample_genome(), &mut prng, &settings);

    assert!(child.is_empty());
}

#[test]
fn test_byte_repeat_duplicates_in_place() {
    let settings = Settings::new(Params {
        chance_repeat_byte: 0.5,
        ..still_params()
    });
    let mut prng = Prng::from_seed("repeat").unwrap();
    let genome = Genome::from(vec![0x01, 0xF0, 0x02, 0x03, 0xF1, 0x04]);

    let mut grew = false;
    for _ in 0..20 {
        let child = replicate_genome(&genome, &mut prng, &settings);
        let mut collapsed = child.as_bytes().to_vec();
        collapsed.dedup();

        assert_eq!(collapsed, genome.as_bytes());
        grew |= child.len() > genome.len();
    }
    assert!(grew, "some byte should have been repeated");
}

#[test]
fn test_byte_transpose_is_a_permutation() {
    let settings = Settings::new(Params {
        chance_transpose_byte: 1.0,
        ..still_params()
    });
    let mut prng = Prng::from_seed("shuffle").unwrap();
    let genome = sample_genome();
    let child = replicate_genome(&genome, &mut prng, &settings);

    let mut expected = genome.as_bytes().to_vec();
    let mut actual = child.as_bytes().to_vec();
    expected.sort_unstable();
    actual.sort_unstable();
    assert_eq!(actual, expected);
}

#[test]
fn test_gene_drop_keeps_preamble() {
    let settings = Settings::new(Params {
        chance_drop_gene: 1.0,
        ..still_params()
    });
    let mut prng = Prng::from_seed("genes").unwrap();
    let genome = Genome::from(vec![0x01, 0x02, 0xF0, 0x03, 0xF1, 0x04]);
    let child = replicate_genome(&genome, &mut prng, &settings);

    assert_eq!(child.as_bytes(), &[0x01, 0x02]);
}

#[test]
fn test_gene_repeat_copies_whole_genes() {
    let settings = Settings::new(Params {
        chance_repeat_gene: 0.5,
        ..still_params()
    });
    let mut prng = Prng::from_seed("twins").unwrap();
    let genome = Genome::from(vec![0xF0, 0x03, 0x05, 0xF1, 0x04]);
    let originals: Vec<Vec<u8>> = genome
        .genes()
        .iter()
        .map(|gene| [&[gene.control][..], gene.body].concat())
        .collect();

    for _ in 0..20 {
        let child = replicate_genome(&genome, &mut prng, &settings);
        assert!(child.len() >= genome.len());

        for gene in child.genes() {
            let whole = [&[gene.control][..], gene.body].concat();
            assert!(originals.contains(&whole));
        }
    }
}

#[test]
fn test_hex_round_trip() {
    let genome = sample_genome();
    let text = genome.to_hex();

    assert_eq!(text, "07f00f03f101f50f");
    assert_eq!(Genome::from_hex(&text).unwrap(), genome);
    assert_eq!(Genome::from_hex("").unwrap(), Genome::default());
}

#[test]
fn test_invalid_hex_is_rejected() {
    assert!(Genome::from_hex("f0f").is_err());
    assert!(Genome::from_hex("zz").is_err());
}
