// Tests for the per-buffer processing pipeline and the input device
// selector.

use voicedesk::{select_preferred_input, AudioDevice, AudioDeviceType, AudioPipeline};

#[test]
fn test_silence_is_left_unchanged() {
    let pipeline = AudioPipeline::default();
    let input = vec![0i16; 512];

    let output = pipeline.process(&input, input.len());

    // RMS of silence is zero, so normalization must be skipped entirely.
    assert_eq!(output, input);
}

#[test]
fn test_noise_gate_zeroes_samples_below_threshold() {
    let pipeline = AudioPipeline::default();
    let threshold = (0.02 * i16::MAX as f64) as i32;

    // Mix of loud and quiet samples so normalization runs too.
    let input: Vec<i16> = (0..256)
        .map(|i| if i % 2 == 0 { 12_000 } else { 3 })
        .collect();
    let output = pipeline.process(&input, input.len());

    for &sample in &output {
        let abs = (sample as i32).abs();
        assert!(
            abs == 0 || abs >= threshold,
            "sample {} survived below the gate threshold {}",
            sample,
            threshold
        );
    }
}

#[test]
fn test_quiet_buffer_is_amplified_toward_target() {
    let pipeline = AudioPipeline::default();
    let input = vec![100i16; 400];

    let output = pipeline.process(&input, input.len());

    // RMS of the constant buffer is ~0.003 of full scale; the target is 0.15,
    // so every sample should come out roughly 49x louder.
    for &sample in &output {
        assert!(
            (4000..6000).contains(&(sample as i32)),
            "expected amplified sample, got {}",
            sample
        );
    }
}

#[test]
fn test_only_valid_length_is_processed() {
    let pipeline = AudioPipeline::default();
    let input = vec![100i16; 100];

    let output = pipeline.process(&input, 40);

    assert_eq!(output.len(), 40, "output covers only the valid prefix");
    assert!(input.iter().all(|&s| s == 100), "input is never mutated");
}

#[test]
fn test_processing_is_deterministic() {
    let pipeline = AudioPipeline::default();
    let input: Vec<i16> = (0..512).map(|i| ((i * 37) % 20_000) as i16).collect();

    let first = pipeline.process(&input, input.len());
    let second = pipeline.process(&input, input.len());

    assert_eq!(first, second);
}

#[test]
fn test_wired_headset_wins_regardless_of_order() {
    let builtin = AudioDevice::new("builtin", AudioDeviceType::BuiltinMic);
    let bluetooth = AudioDevice::new("bt", AudioDeviceType::BluetoothSco);
    let wired = AudioDevice::new("wired", AudioDeviceType::WiredHeadset);

    let orderings = [
        vec![builtin.clone(), bluetooth.clone(), wired.clone()],
        vec![wired.clone(), builtin.clone(), bluetooth.clone()],
        vec![bluetooth.clone(), wired.clone(), builtin.clone()],
    ];
    for devices in orderings {
        let selected = select_preferred_input(&devices).expect("one device must win");
        assert_eq!(selected.device_type, AudioDeviceType::WiredHeadset);
    }
}

#[test]
fn test_empty_device_set_yields_no_preference() {
    assert!(select_preferred_input(&[]).is_none());
}

#[test]
fn test_unranked_types_sort_last() {
    let devices = vec![
        AudioDevice::new("mystery", AudioDeviceType::Other),
        AudioDevice::new("builtin", AudioDeviceType::BuiltinMic),
    ];
    let selected = select_preferred_input(&devices).unwrap();
    assert_eq!(selected.device_type, AudioDeviceType::BuiltinMic);
}

#[test]
fn test_equal_rank_keeps_input_order() {
    let devices = vec![
        AudioDevice::new("first", AudioDeviceType::BuiltinMic),
        AudioDevice::new("second", AudioDeviceType::BuiltinMic),
    ];
    let selected = select_preferred_input(&devices).unwrap();
    assert_eq!(selected.name, "first");
}
