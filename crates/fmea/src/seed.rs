//! The example analysis used to seed a new session.
//!
//! An aircraft broken down into propulsion, electrical and avionics
//! subsystems. Only the shape matters to the rest of the crate; the tests use
//! it as a realistic fixture.

use crate::tree::{Controls, FaultNode, ParentNode, TreeNode};

fn fault(
    id: &str,
    name: &str,
    effect: &str,
    cause: &str,
    (severity, occurrence, detection): (u32, u32, u32),
    preventive: &str,
    detection_controls: &str,
) -> TreeNode {
    TreeNode::Fault(FaultNode {
        id: id.to_string(),
        name: name.to_string(),
        effect: effect.to_string(),
        cause: cause.to_string(),
        severity,
        occurrence,
        detection,
        controls: Controls {
            preventive: preventive.to_string(),
            detection: detection_controls.to_string(),
        },
    })
}

fn function(id: &str, name: &str, faults: Vec<TreeNode>) -> TreeNode {
    TreeNode::Function(ParentNode {
        id: id.to_string(),
        name: name.to_string(),
        children: faults,
    })
}

fn component(id: &str, name: &str, functions: Vec<TreeNode>) -> TreeNode {
    TreeNode::Component(ParentNode {
        id: id.to_string(),
        name: name.to_string(),
        children: functions,
    })
}

fn subsystem(id: &str, name: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode::Subsystem(ParentNode {
        id: id.to_string(),
        name: name.to_string(),
        children,
    })
}

/// Build the example aircraft analysis.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn initial_tree() -> TreeNode {
    TreeNode::System(ParentNode {
        id: "aircraft_system".to_string(),
        name: "Aircraft System".to_string(),
        children: vec![
            subsystem(
                "propulsion_subsystem",
                "Propulsion Subsystem",
                vec![
                    component(
                        "engine",
                        "Engine",
                        vec![
                            function(
                                "generate_thrust",
                                "Generate Thrust",
                                vec![
                                    fault(
                                        "fuel_starvation",
                                        "Fuel Starvation",
                                        "Loss of engine power",
                                        "Fuel supply interruption",
                                        (9, 4, 3),
                                        "Regular fuel system inspections\nFuel filter maintenance",
                                        "Fuel pressure monitoring\nEmergency fuel pump system",
                                    ),
                                    fault(
                                        "compressor_failure",
                                        "Compressor Failure",
                                        "Reduced engine performance",
                                        "Foreign object damage",
                                        (6, 3, 5),
                                        "Regular inspections\nFOD prevention training",
                                        "Compressor health monitoring\nVibration analysis",
                                    ),
                                ],
                            ),
                            function(
                                "control_engine_speed",
                                "Control Engine Speed",
                                vec![fault(
                                    "throttle_malfunction",
                                    "Throttle Malfunction",
                                    "Uncontrolled engine speed",
                                    "Faulty throttle sensor",
                                    (7, 3, 2),
                                    "Redundant sensors\nRegular calibration",
                                    "Fail-safe mechanisms\nPilot override capability",
                                )],
                            ),
                        ],
                    ),
                    component(
                        "fuel_system",
                        "Fuel System",
                        vec![
                            function(
                                "store_fuel",
                                "Store Fuel",
                                vec![fault(
                                    "fuel_tank_leak",
                                    "Fuel Tank Leak",
                                    "Fuel loss during flight",
                                    "Structural damage",
                                    (8, 2, 5),
                                    "Regular tank inspections",
                                    "",
                                )],
                            ),
                            function(
                                "refuel_aircraft",
                                "Refuel Aircraft",
                                vec![fault(
                                    "fuel_spill",
                                    "Fuel Spill",
                                    "Environmental hazard",
                                    "Improper refueling procedures",
                                    (6, 4, 3),
                                    "Training and monitoring",
                                    "",
                                )],
                            ),
                        ],
                    ),
                ],
            ),
            subsystem(
                "electrical_subsystem",
                "Electrical Subsystem",
                vec![
                    component(
                        "battery",
                        "Battery",
                        vec![function(
                            "provide_electrical_power",
                            "Provide Electrical Power",
                            vec![
                                fault(
                                    "battery_depletion",
                                    "Battery Depletion",
                                    "Loss of electrical power",
                                    "Excessive power draw",
                                    (6, 5, 2),
                                    "Battery charge monitoring\nLoad shedding procedures",
                                    "Redundant power sources\nRegular battery health checks",
                                ),
                                fault(
                                    "short_circuit",
                                    "Short Circuit",
                                    "Electrical system failure",
                                    "Insulation breakdown",
                                    (9, 3, 4),
                                    "Circuit breakers\nRegular wiring inspections",
                                    "Insulation resistance testing\nFault current limiters",
                                ),
                            ],
                        )],
                    ),
                    component(
                        "generator",
                        "Generator",
                        vec![function(
                            "generate_electricity",
                            "Generate Electricity",
                            vec![
                                fault(
                                    "generator_overheating",
                                    "Overheating",
                                    "Generator shutdown",
                                    "Cooling system failure",
                                    (10, 8, 7),
                                    "",
                                    "Temperature sensors",
                                ),
                                fault(
                                    "voltage_fluctuation",
                                    "Voltage Fluctuation",
                                    "Inconsistent power supply",
                                    "Load changes",
                                    (6, 4, 5),
                                    "Voltage regulators",
                                    "",
                                ),
                            ],
                        )],
                    ),
                ],
            ),
            subsystem(
                "avionics_subsystem",
                "Avionics Subsystem",
                vec![
                    component(
                        "navigation_system",
                        "Navigation System",
                        vec![function(
                            "provide_navigation_data",
                            "Provide Navigation Data",
                            vec![
                                fault(
                                    "gps_failure",
                                    "GPS Failure",
                                    "Loss of accurate position data",
                                    "Satellite signal interference",
                                    (7, 4, 3),
                                    "",
                                    "Redundant navigation systems",
                                ),
                                fault(
                                    "navigation_software_error",
                                    "Navigation Software Error",
                                    "Incorrect navigation data",
                                    "Software bug",
                                    (6, 3, 5),
                                    "Regular software updates",
                                    "",
                                ),
                            ],
                        )],
                    ),
                    function(
                        "system_health_monitoring",
                        "System Health Monitoring",
                        vec![
                            fault(
                                "sensor_failure",
                                "Sensor Failure",
                                "Inaccurate health data",
                                "Sensor malfunction",
                                (6, 4, 3),
                                "Regular sensor calibration",
                                "",
                            ),
                            fault(
                                "data_processing_error",
                                "Data Processing Error",
                                "Delayed health status updates",
                                "Software glitch",
                                (5, 3, 2),
                                "",
                                "Error handling protocols",
                            ),
                        ],
                    ),
                ],
            ),
            function(
                "fuel_efficiency_monitoring",
                "Fuel Efficiency Monitoring",
                vec![
                    fault(
                        "fuel_leak_detection",
                        "Fuel Leak Detection",
                        "Loss of fuel efficiency",
                        "Leak in fuel lines",
                        (7, 4, 3),
                        "Regular inspections",
                        "Monitoring systems",
                    ),
                    fault(
                        "engine_tuning_issue",
                        "Engine Tuning Issue",
                        "Suboptimal fuel consumption",
                        "Improper engine calibration",
                        (6, 3, 2),
                        "Routine engine tuning",
                        "Diagnostics",
                    ),
                ],
            ),
        ],
    })
}
